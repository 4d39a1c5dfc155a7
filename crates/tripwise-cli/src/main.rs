//! Tripwise CLI - budget-friendly student travel itineraries

use std::process::ExitCode;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tripwise_core::config::{API_KEY_ENV, Config};
use tripwise_core::error::Error;
use tripwise_core::llm::{GenerationClient, GenerationOutcome, RetryEvent};
use tripwise_core::prompt::build_prompt;
use tripwise_core::trip::{MAX_DAYS, MIN_BUDGET_USD, MIN_DAYS, SUGGESTED_INTERESTS, TripRequest};

#[derive(Parser)]
#[command(name = "tripwise")]
#[command(author, version, about = "AI student travel planner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an itinerary for a trip
    Plan(TripArgs),

    /// Print the prompt that would be sent, without calling the API
    Prompt(TripArgs),

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Run health check
    Doctor,
}

#[derive(Args, Debug, Clone)]
struct TripArgs {
    /// Destination (City, Country)
    #[arg(short, long, default_value = "Hyderabad, India")]
    destination: String,

    /// Number of days (ignored when --end is given)
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(MIN_DAYS as i64..=MAX_DAYS as i64))]
    days: u32,

    /// Start date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD); recomputes the number of days
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Comma-separated interests, e.g. Culture,Food,Nature
    #[arg(short, long, value_delimiter = ',', default_value = "Culture,History")]
    interests: Vec<String>,

    /// Total budget in USD
    #[arg(short, long, default_value_t = 200.0)]
    budget: f64,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

/// A validated trip plus any note about adjusted inputs
#[derive(Debug)]
struct PreparedTrip {
    trip: TripRequest,
    note: Option<String>,
}

impl TripArgs {
    /// Turn flags into a validated trip, resolving the date range against `today`
    fn prepare(&self, today: NaiveDate) -> anyhow::Result<PreparedTrip> {
        let start = self.start.unwrap_or(today);
        let interests = self.interests.iter().map(String::as_str);

        let (trip, note) = match self.end {
            Some(end) => {
                let trip = TripRequest::from_dates(&self.destination, start, end, interests, self.budget);
                let note = (trip.days != self.days && trip.days > 0)
                    .then(|| format!("Days updated to {} based on your dates.", trip.days));
                (trip, note)
            }
            None => (
                TripRequest::from_days(&self.destination, start, self.days, interests, self.budget),
                None,
            ),
        };

        if self.budget < MIN_BUDGET_USD {
            return Err(Error::InvalidInput(format!(
                "Budget must be at least ${}, got ${}",
                MIN_BUDGET_USD, self.budget
            ))
            .into());
        }
        trip.validate()?;

        for interest in &trip.interests {
            if !SUGGESTED_INTERESTS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(interest))
            {
                debug!(interest = %interest, "Interest outside the suggested list");
            }
        }

        Ok(PreparedTrip { trip, note })
    }
}

fn title(trip: &TripRequest) -> String {
    format!("Your {}-Day Student Trip to {}", trip.days, trip.destination)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // A missing .env file is fine; the environment may already carry the key
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tripwise=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan(args) => cmd_plan(&args, cli.format, cli.quiet).await,
        Commands::Prompt(args) => cmd_prompt(&args, cli.format),
        Commands::Config { action } => cmd_config(action, cli.quiet).map(|_| ExitCode::SUCCESS),
        Commands::Doctor => Ok(cmd_doctor(cli.quiet)),
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn cmd_plan(args: &TripArgs, format: OutputFormat, quiet: bool) -> anyhow::Result<ExitCode> {
    let config = Config::load()?;

    let api_key = config.generation.resolved_api_key().ok_or_else(|| {
        Error::ConfigError(format!(
            "{} is not set. Add it to your environment or a .env file.",
            API_KEY_ENV
        ))
    })?;

    let PreparedTrip { trip, note } = args.prepare(Local::now().date_naive())?;
    let chatty = format == OutputFormat::Text && !quiet;

    if let Some(note) = note
        && chatty
    {
        println!("{}", note);
    }

    let client = GenerationClient::new(config.generation, api_key)?.with_observer(Arc::new(
        move |event: &RetryEvent| {
            if !quiet {
                eprintln!("Warning: {}", event);
            }
        },
    ));

    if chatty {
        println!(
            "Contacting the generation API to plan your {}-day trip to {}...",
            trip.days, trip.destination
        );
    }

    let outcome = client.generate(&trip).await;
    let heading = title(&trip);

    match format {
        OutputFormat::Json => {
            let value = match &outcome {
                GenerationOutcome::Success(text) => serde_json::json!({
                    "status": "success",
                    "title": heading,
                    "text": text,
                }),
                GenerationOutcome::Failure(message) => serde_json::json!({
                    "status": "failure",
                    "title": heading,
                    "error": message,
                }),
            };
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => match &outcome {
            GenerationOutcome::Success(text) => {
                if !quiet {
                    println!();
                    println!("{}", heading);
                    println!("{}", "=".repeat(heading.chars().count()));
                    println!();
                }
                println!("{}", text);
            }
            GenerationOutcome::Failure(message) => {
                eprintln!("{}", message);
            }
        },
    }

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn cmd_prompt(args: &TripArgs, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let PreparedTrip { trip, note } = args.prepare(Local::now().date_naive())?;
    let prompt = build_prompt(&trip);

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "trip": trip,
                "prompt": prompt,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            if let Some(note) = note {
                eprintln!("{}", note);
            }
            println!("{}", prompt);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let items = config.list()?;
            for (key, value) in items {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn cmd_doctor(quiet: bool) -> ExitCode {
    if !quiet {
        println!("Tripwise Health Check");
        println!("=====================");
        println!();
    }

    let mut all_ok = true;

    // Check configuration
    match Config::load() {
        Ok(config) => {
            if !quiet {
                println!("[OK] Configuration: Valid");
                println!("[OK] Endpoint: {}", config.generation.endpoint);
            }

            // Check API key
            match config.generation.redacted_api_key() {
                Some(redacted) => {
                    if !quiet {
                        println!("[OK] API Key: Configured ({})", redacted);
                    }
                }
                None => {
                    all_ok = false;
                    if !quiet {
                        println!("[!!] API Key: Not configured");
                        println!("     Set the {} environment variable", API_KEY_ENV);
                    }
                }
            }
        }
        Err(e) => {
            all_ok = false;
            if !quiet {
                println!("[!!] Configuration: Error - {:#}", e);
            }
        }
    }

    // Check config file location
    if !quiet {
        match Config::config_path() {
            Ok(path) => {
                if path.exists() {
                    println!("[OK] Config file: {}", path.display());
                } else {
                    println!("[--] Config file: {} (using defaults)", path.display());
                }
            }
            Err(e) => {
                println!("[!!] Config file: Error - {}", e);
            }
        }
        println!();
        if all_ok {
            println!("All checks passed.");
        } else {
            println!("Some checks failed.");
        }
    }

    if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
