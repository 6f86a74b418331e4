//! Error types for the LLM Wars application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    /// A provider's secret is not configured
    #[error("{var} not found in environment variables")]
    MissingCredential { provider: String, var: String },

    /// Provider or model is not in the catalog
    #[error("Invalid selection: {provider}: {model} is not in the provider catalog")]
    InvalidSelection { provider: String, model: String },

    /// Blank prompt
    #[error("Prompt cannot be empty")]
    EmptyPrompt,

    /// Configuration or question bank problem
    #[error("Failed to read configuration: {0}")]
    ConfigError(String),

    /// Transport failure; the request URL is stripped
    #[error("HTTP request failed: {0}")]
    RequestError(#[source] reqwest::Error),

    /// Malformed response body
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// File access failure
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Provider returned a non-success status
    #[error("{provider} API error: {message}")]
    ApiError { provider: String, message: String },

    /// Success status without any answer text
    #[error("{provider} returned no response content")]
    EmptyResponse { provider: String },

    /// A spawned call did not finish normally
    #[error("Query task failed: {0}")]
    TaskFailed(String),
}

impl AppError {
    /// Classify an error for the per-selection result it ends up in
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::MissingCredential { .. } => FailureKind::MissingCredential,
            _ => FailureKind::Transport,
        }
    }
}

// Request URLs can carry secrets as query parameters
impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        Self::RequestError(e.without_url())
    }
}

/// Why a single provider call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The provider's secret was not configured
    MissingCredential,
    /// Network failure, malformed response or provider-side error
    Transport,
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;
