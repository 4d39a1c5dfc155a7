//! Trip parameters supplied by the caller
//!
//! The generation client trusts whatever it is given; `TripRequest::validate`
//! is the check a front end runs before handing a request over.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Shortest trip the planner accepts
pub const MIN_DAYS: u32 = 1;

/// Longest trip the planner accepts
pub const MAX_DAYS: u32 = 14;

/// Smallest total budget the front end offers, in USD
pub const MIN_BUDGET_USD: f64 = 50.0;

/// Interest choices offered by the front end
pub const SUGGESTED_INTERESTS: &[&str] = &[
    "Culture",
    "Shopping",
    "History",
    "Adventure",
    "Food",
    "Nature",
    "Art",
    "Sports",
];

/// Parameters for one itinerary request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    /// Destination, e.g. "Hyderabad, India"
    pub destination: String,
    /// Number of days covered by the itinerary
    pub days: u32,
    /// First day of travel
    pub start_date: NaiveDate,
    /// Last day of travel (inclusive)
    pub end_date: NaiveDate,
    /// Interests in the order they were chosen, without duplicates
    pub interests: Vec<String>,
    /// Total budget in USD
    pub budget_usd: f64,
}

impl TripRequest {
    /// Create a request whose end date follows from the day count
    ///
    /// An end date past the calendar's range is clamped to `NaiveDate::MAX`,
    /// which `validate` then rejects as not covering `days`.
    pub fn from_days(
        destination: impl Into<String>,
        start_date: NaiveDate,
        days: u32,
        interests: impl IntoIterator<Item = impl Into<String>>,
        budget_usd: f64,
    ) -> Self {
        let span = Days::new(u64::from(days.max(1)) - 1);
        Self {
            destination: destination.into(),
            days,
            start_date,
            end_date: start_date.checked_add_days(span).unwrap_or(NaiveDate::MAX),
            interests: dedup_interests(interests),
            budget_usd,
        }
    }

    /// Create a request whose day count follows from an inclusive date range
    ///
    /// A reversed range yields a day count of zero, which `validate` rejects.
    pub fn from_dates(
        destination: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        interests: impl IntoIterator<Item = impl Into<String>>,
        budget_usd: f64,
    ) -> Self {
        Self {
            destination: destination.into(),
            days: days_between(start_date, end_date),
            start_date,
            end_date,
            interests: dedup_interests(interests),
            budget_usd,
        }
    }

    /// Check the bounds a front end is expected to enforce
    pub fn validate(&self) -> Result<()> {
        if self.destination.trim().is_empty() {
            return Err(Error::InvalidInput("Destination must not be empty".to_string()));
        }
        if !(MIN_DAYS..=MAX_DAYS).contains(&self.days) {
            return Err(Error::InvalidInput(format!(
                "Number of days must be between {} and {}, got {}",
                MIN_DAYS, MAX_DAYS, self.days
            )));
        }
        if self.start_date > self.end_date {
            return Err(Error::InvalidInput(format!(
                "Start date {} is after end date {}",
                self.start_date, self.end_date
            )));
        }
        if days_between(self.start_date, self.end_date) != self.days {
            return Err(Error::InvalidInput(format!(
                "Dates {} to {} do not cover {} days",
                self.start_date, self.end_date, self.days
            )));
        }
        if !self.budget_usd.is_finite() || self.budget_usd <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "Budget must be a positive amount, got {}",
                self.budget_usd
            )));
        }
        Ok(())
    }

    /// Interests joined for display, e.g. "Culture, History"
    pub fn interests_label(&self) -> String {
        self.interests.join(", ")
    }
}

/// Inclusive day count of a date range, zero when reversed
pub fn days_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let days = (end - start).num_days() + 1;
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

fn dedup_interests(interests: impl IntoIterator<Item = impl Into<String>>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for interest in interests {
        let interest: String = interest.into();
        let interest = interest.trim().to_string();
        if !interest.is_empty() && !out.iter().any(|i| i.eq_ignore_ascii_case(&interest)) {
            out.push(interest);
        }
    }
    out
}
