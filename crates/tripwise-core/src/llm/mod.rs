//! LLM integration - hosted text generation
//!
//! This module provides:
//! - The generation client with bounded exponential-backoff retry
//! - Request/response types matching the `generateContent` API
//! - A transport seam with a reqwest implementation
//! - Retry classification and a caller-supplied progress observer

mod client;
mod retry;
mod transport;
mod types;

pub use client::{GenerationClient, GenerationClientBuilder, GenerationOutcome};
pub use retry::{RetryCause, RetryEvent, RetryObserver, StatusClass, TRANSIENT_STATUSES, TracingObserver};
pub use transport::{HttpTransport, RawResponse, Transport};
pub use types::{
    Candidate, Content, GenerateRequest, GenerateResponse, GenerationOptions, Part, extract_text,
};
