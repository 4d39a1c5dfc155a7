//! Tripwise Core Library
//!
//! This crate provides the core functionality for Tripwise, including:
//! - Trip parameters and caller-side validation
//! - Deterministic itinerary prompt rendering
//! - Generation client with retry and recovery (hosted LLM API)
//! - Configuration with file persistence

pub mod trip;
pub mod prompt;
pub mod llm;
pub mod config;
pub mod error;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, GenerationConfig};
    pub use crate::error::{Error, Result};
    pub use crate::llm::{GenerationClient, GenerationOutcome, RetryEvent, RetryObserver};
    pub use crate::trip::TripRequest;
}
