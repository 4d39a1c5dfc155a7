//! Error types for Tripwise

use thiserror::Error;

/// Result type alias using Tripwise's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Tripwise error types with helpful messages and suggestions
///
/// The `Display` output of every variant is the displayable failure string
/// handed back to the caller, so each message starts with its category.
#[derive(Error, Debug)]
pub enum Error {
    // Network errors (E100-E199)
    #[error("Network error: {0}")]
    Transport(String),

    #[error("API error: status code {status}\n\nResponse details:\n{body}")]
    ApiError { status: u16, body: String },

    #[error("Parse error: could not parse a valid response text from the API ({0})")]
    ParseError(String),

    #[error("API error: failed to connect after {attempts} attempts (last: {last})")]
    RetriesExhausted { attempts: u32, last: String },

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Input errors (E800-E899)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "E100",
            Self::ApiError { .. } => "E101",
            Self::ParseError(_) => "E102",
            Self::RetriesExhausted { .. } => "E103",
            Self::ConfigError(_) => "E600",
            Self::InvalidInput(_) => "E800",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Transport(_) | Self::RetriesExhausted { .. } => {
                Some("Check internet connection and try again later".to_string())
            }
            Self::ApiError { status: 401 | 403, .. } => {
                Some("Check the GEMINI_API_KEY environment variable".to_string())
            }
            Self::ApiError { status: 404, .. } => {
                Some("tripwise config get generation.endpoint".to_string())
            }
            Self::ConfigError(_) => Some("tripwise config list".to_string()),
            _ => None,
        }
    }
}
