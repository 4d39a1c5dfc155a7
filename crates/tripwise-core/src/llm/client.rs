//! Generation client implementation
//!
//! Provides the itinerary generation call with:
//! - Prompt construction from a trip request
//! - Credential check before any network activity
//! - Bounded exponential backoff on rate limits, server errors and connection faults
//! - Immediate failure on permanent API errors and malformed success bodies

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::config::{API_KEY_ENV, GenerationConfig};
use crate::error::{Error, Result};
use crate::prompt::build_prompt;
use crate::trip::TripRequest;

use super::retry::{RetryCause, RetryEvent, RetryObserver, RetryState, StatusClass, TracingObserver};
use super::transport::{HttpTransport, Transport};
use super::types::{GenerateRequest, GenerationOptions, extract_text};

/// Result of one generation call as shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Generated itinerary text
    Success(String),
    /// Displayable failure message, prefixed with its category
    Failure(String),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The itinerary or the failure message
    pub fn message(&self) -> &str {
        match self {
            Self::Success(text) | Self::Failure(text) => text,
        }
    }
}

impl fmt::Display for GenerationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl From<Result<String>> for GenerationOutcome {
    fn from(result: Result<String>) -> Self {
        match result {
            Ok(text) => Self::Success(text),
            Err(e) => Self::Failure(e.to_string()),
        }
    }
}

/// Client for the hosted generation endpoint
///
/// Cheap to clone and safe to share; every call keeps its own retry state.
#[derive(Clone)]
pub struct GenerationClient {
    /// Sends requests (HTTP unless replaced)
    transport: Arc<dyn Transport>,
    /// Receives a notification before every backoff
    observer: Arc<dyn RetryObserver>,
    /// Endpoint, sampling options and retry budget
    config: GenerationConfig,
    /// API key, sent as the `key` query parameter
    api_key: String,
}

impl fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationClient")
            .field("endpoint", &self.config.endpoint)
            .field("max_attempts", &self.config.max_attempts)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Builder for creating a GenerationClient
#[derive(Default)]
pub struct GenerationClientBuilder {
    config: Option<GenerationConfig>,
    api_key: Option<String>,
    transport: Option<Arc<dyn Transport>>,
    observer: Option<Arc<dyn RetryObserver>>,
}

impl GenerationClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the generation configuration
    pub fn config(mut self, config: GenerationConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the API key
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the endpoint from the configuration
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.get_or_insert_with(GenerationConfig::default).endpoint = endpoint.into();
        self
    }

    /// Override the attempt cap from the configuration
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.config.get_or_insert_with(GenerationConfig::default).max_attempts = max_attempts;
        self
    }

    /// Replace the HTTP transport
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the retry observer (defaults to [`TracingObserver`])
    pub fn observer(mut self, observer: Arc<dyn RetryObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Build the GenerationClient
    pub fn build(self) -> Result<GenerationClient> {
        let config = self.config.unwrap_or_default();
        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("{:#}", e)))?;

        let api_key = self.api_key.ok_or_else(|| {
            Error::ConfigError(format!("API key is required. Set the {} environment variable.", API_KEY_ENV))
        })?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(config.timeout())?),
        };

        Ok(GenerationClient {
            transport,
            observer: self.observer.unwrap_or_else(|| Arc::new(TracingObserver)),
            config,
            api_key,
        })
    }
}

impl GenerationClient {
    /// Create a new GenerationClient with the given configuration and API key
    pub fn new(config: GenerationConfig, api_key: impl Into<String>) -> Result<Self> {
        GenerationClientBuilder::new()
            .config(config)
            .api_key(api_key)
            .build()
    }

    /// Create a new builder for GenerationClient
    pub fn builder() -> GenerationClientBuilder {
        GenerationClientBuilder::new()
    }

    /// Replace the retry observer
    pub fn with_observer(mut self, observer: Arc<dyn RetryObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Get the configured endpoint
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Get the attempt cap
    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts
    }

    /// Generate an itinerary, folding every error into a displayable failure
    pub async fn generate(&self, trip: &TripRequest) -> GenerationOutcome {
        self.try_generate(trip).await.into()
    }

    /// Generate an itinerary
    ///
    /// The request is not re-validated; see [`TripRequest::validate`].
    pub async fn try_generate(&self, trip: &TripRequest) -> Result<String> {
        if self.api_key.trim().is_empty() {
            return Err(Error::ConfigError(format!(
                "API key is missing or empty. Set the {} environment variable.",
                API_KEY_ENV
            )));
        }

        let request = self.build_request(trip);
        debug!(
            destination = %trip.destination,
            days = trip.days,
            "Requesting itinerary"
        );
        self.execute_request(&request).await
    }

    /// Build the request body for a trip
    pub fn build_request(&self, trip: &TripRequest) -> GenerateRequest {
        GenerateRequest::from_prompt(
            build_prompt(trip),
            GenerationOptions {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        )
    }

    /// Execute a request with retry logic
    async fn execute_request(&self, request: &GenerateRequest) -> Result<String> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut state = RetryState::default();

        while state.attempt < max_attempts {
            let attempt = state.attempt;
            debug!(attempt, max_attempts, "Sending generation attempt");

            let cause = match self
                .transport
                .send(&self.config.endpoint, &self.api_key, request)
                .await
            {
                Ok(response) => match StatusClass::of(response.status) {
                    StatusClass::Success => {
                        let text = extract_text(&response.body).map_err(|reason| {
                            error!(reason = %reason, "Malformed success response");
                            Error::ParseError(reason)
                        })?;
                        info!(attempt, chars = text.len(), "Itinerary generated");
                        return Ok(text);
                    }
                    StatusClass::Transient => RetryCause::Status(response.status),
                    StatusClass::Permanent => {
                        error!(status = response.status, "Permanent API error");
                        return Err(Error::ApiError {
                            status: response.status,
                            body: response.body,
                        });
                    }
                },
                Err(Error::Transport(message)) => RetryCause::Transport(message),
                Err(e) => return Err(e),
            };

            state.last = Some(cause.clone());
            state.attempt += 1;

            // No wait after the final attempt
            if state.attempt < max_attempts {
                let event = RetryEvent {
                    attempt,
                    cause,
                    wait: self.config.backoff_for(attempt),
                };
                self.observer.on_retry(&event);
                tokio::time::sleep(event.wait).await;
            }
        }

        error!(attempts = max_attempts, last = %state.last_label(), "Retry budget exhausted");
        Err(Error::RetriesExhausted {
            attempts: max_attempts,
            last: state.last_label(),
        })
    }
}
