//! The remote signup endpoint.
//!
//! The form only ever sees the [`SubmissionEndpoint`] trait. [`MockEndpoint`]
//! stands in for a real service: it waits a fixed delay and rejects exactly
//! one address as already registered.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_ENDPOINT_DELAY;

/// The address the mock endpoint treats as already registered.
pub const REPEATED_EMAIL: &str = "repeated@gmail.com";

/// Payload sent to the endpoint.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Outcome reported by the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndpointStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "ERROR")]
    Error,
}

/// Response body of the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointResponse {
    pub status: EndpointStatus,
}

impl EndpointResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: EndpointStatus::Ok,
        }
    }

    #[must_use]
    pub fn error() -> Self {
        Self {
            status: EndpointStatus::Error,
        }
    }
}

/// The endpoint failed to produce a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    /// The request never completed.
    Transport(String),
    /// A response arrived but could not be understood.
    Protocol(String),
}

impl fmt::Display for EndpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::Protocol(msg) => write!(f, "protocol error: {msg}"),
        }
    }
}

impl std::error::Error for EndpointError {}

/// An asynchronous signup service.
#[async_trait]
pub trait SubmissionEndpoint: Send + Sync {
    /// Submit one signup. Resolves once the service has answered.
    async fn submit(&self, payload: Credentials) -> Result<EndpointResponse, EndpointError>;
}

/// Simulated endpoint with fixed latency.
///
/// Answers [`EndpointStatus::Error`] iff the email is exactly
/// [`REPEATED_EMAIL`] (case-sensitive), and [`EndpointStatus::Ok`] otherwise.
/// Never fails.
#[derive(Debug, Clone)]
pub struct MockEndpoint {
    delay: Duration,
}

impl Default for MockEndpoint {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT_DELAY)
    }
}

impl MockEndpoint {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl SubmissionEndpoint for MockEndpoint {
    async fn submit(&self, payload: Credentials) -> Result<EndpointResponse, EndpointError> {
        let repeated = payload.email == REPEATED_EMAIL;
        tokio::time::sleep(self.delay).await;
        tracing::debug!(email = %payload.email, repeated, "mock endpoint answered");
        Ok(if repeated {
            EndpointResponse::error()
        } else {
            EndpointResponse::ok()
        })
    }
}
