//! Retry classification and progress reporting
//!
//! Statuses fall into three buckets: 200 is parsed, 429/500/503 are retried
//! with exponential backoff, and everything else is surfaced as-is.

use std::fmt;
use std::time::Duration;

use tracing::warn;

/// HTTP statuses treated as transient
pub const TRANSIENT_STATUSES: [u16; 3] = [429, 500, 503];

/// What the client should do with a response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// Parse the body
    Success,
    /// Back off and try again
    Transient,
    /// Give up immediately
    Permanent,
}

impl StatusClass {
    pub fn of(status: u16) -> Self {
        match status {
            200 => Self::Success,
            s if TRANSIENT_STATUSES.contains(&s) => Self::Transient,
            _ => Self::Permanent,
        }
    }
}

/// Why an attempt is being retried
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryCause {
    /// Rate limit or server error
    Status(u16),
    /// Connection-level fault
    Transport(String),
}

impl fmt::Display for RetryCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryCause::Status(status) => write!(f, "status {}", status),
            RetryCause::Transport(message) => write!(f, "connection error: {}", message),
        }
    }
}

/// A scheduled backoff, reported before the client sleeps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryEvent {
    /// 0-indexed attempt that just failed
    pub attempt: u32,
    pub cause: RetryCause,
    /// How long the client will wait before the next attempt
    pub wait: Duration,
}

impl fmt::Display for RetryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match &self.cause {
            RetryCause::Status(status) => format!("Rate limit or server error ({})", status),
            RetryCause::Transport(message) => format!("Connection error: {}", message),
        };
        write!(f, "{}. Retrying in {}s...", what, self.wait.as_secs_f64())
    }
}

/// Receives progress while the client backs off
pub trait RetryObserver: Send + Sync {
    fn on_retry(&self, event: &RetryEvent);
}

impl<F> RetryObserver for F
where
    F: Fn(&RetryEvent) + Send + Sync,
{
    fn on_retry(&self, event: &RetryEvent) {
        self(event)
    }
}

/// Default observer: one `warn!` per scheduled retry
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RetryObserver for TracingObserver {
    fn on_retry(&self, event: &RetryEvent) {
        warn!(
            attempt = event.attempt,
            cause = %event.cause,
            wait_ms = event.wait.as_millis() as u64,
            "Transient failure, retrying after backoff"
        );
    }
}

/// Per-call retry bookkeeping
#[derive(Debug, Clone, Default)]
pub(crate) struct RetryState {
    pub attempt: u32,
    pub last: Option<RetryCause>,
}

impl RetryState {
    pub fn last_label(&self) -> String {
        self.last
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "no attempt made".to_string())
    }
}
