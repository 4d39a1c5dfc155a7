//! Prompt rendering for itinerary generation
//!
//! The prompt pins the response layout by pre-rendering one section per day,
//! each with the same five placeholder lines for the model to fill in.

use std::fmt::Write;

use crate::trip::TripRequest;

/// Title of the closing tips section the model is asked to write
pub const TIPS_SECTION_TITLE: &str = "💰 Money-Saving Pro Tips";

/// Number of tips requested in the closing section
pub const TIPS_COUNT: usize = 3;

/// Placeholder lines rendered under every day header, in order
pub const DAY_SECTION_LABELS: [(&str, &str); 5] = [
    ("Morning", "Fill in low-cost/free activity"),
    ("Afternoon", "Fill in cultural/interest activity"),
    ("Evening", "Fill in cheap food market/local hangout"),
    ("Transport Tip", "Fill in public transport advice"),
    ("Estimated Daily Cost", "Fill in rough daily budget"),
];

/// Header line of the section for `day` (1-based)
pub fn day_header(day: u32) -> String {
    format!("### Day {}", day)
}

/// Render the day-by-day skeleton for `days` days
pub fn day_sections(days: u32) -> String {
    let mut out = String::new();
    for day in 1..=days {
        // Writing to a String cannot fail
        let _ = writeln!(out, "\n{}", day_header(day));
        for (label, placeholder) in DAY_SECTION_LABELS {
            let _ = writeln!(out, "-   **{}:** [{}]", label, placeholder);
        }
    }
    out
}

/// Build the full prompt for a trip
///
/// Output is a pure function of the request; no clock or randomness is read.
pub fn build_prompt(trip: &TripRequest) -> String {
    let days = trip.days;
    format!(
        "You are an expert travel planner creating a detailed, budget-friendly itinerary for students.\n\
         \n\
         Destination: {destination}\n\
         Days: {days}\n\
         Interests: {interests}\n\
         Budget: ${budget} (Total estimated cost)\n\
         Travel Dates: {start} to {end}\n\
         \n\
         Generate the **{days}-day itinerary** below, strictly filling in the content for each of the pre-defined Day sections.\n\
         {sections}\n\
         Conclude the itinerary with a final section titled '{tips_title}' listing exactly {tips_count} actionable, \
         specific budget tips for this destination. Format the entire response using Markdown for clear readability.\n",
        destination = trip.destination,
        days = days,
        interests = trip.interests_label(),
        budget = trip.budget_usd,
        start = trip.start_date.format("%Y-%m-%d"),
        end = trip.end_date.format("%Y-%m-%d"),
        sections = day_sections(days),
        tips_title = TIPS_SECTION_TITLE,
        tips_count = TIPS_COUNT,
    )
}
