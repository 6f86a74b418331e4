//! Provider adapters: one implementation per LLM vendor behind a single trait

mod anthropic;
mod codegpt;
mod google;
mod openai;

pub use anthropic::AnthropicAdapter;
pub use codegpt::CodeGptAdapter;
pub use google::GoogleAdapter;
pub use openai::OpenAIAdapter;

use crate::config::{credential_var, Config};
use crate::error::{AppError, FailureKind, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Text and token usage produced by one provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Response text
    pub text: String,
    /// Prompt tokens, reported or estimated
    pub tokens_in: u32,
    /// Response tokens, reported or estimated
    pub tokens_out: u32,
}

impl Completion {
    /// Completion with exact token counts
    pub fn new(text: impl Into<String>, tokens_in: u32, tokens_out: u32) -> Self {
        Self {
            text: text.into(),
            tokens_in,
            tokens_out,
        }
    }

    /// Completion for a provider that does not report usage
    pub fn estimated(prompt: &str, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            tokens_in: estimate_tokens(prompt),
            tokens_out: estimate_tokens(&text),
            text,
        }
    }
}

/// Rough token count: one token per four characters
pub fn estimate_tokens(text: &str) -> u32 {
    (text.chars().count() / 4) as u32
}

/// Tagged result of a provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The provider answered
    Success(Completion),
    /// The call failed; `message` is shown in place of an answer
    Failure { kind: FailureKind, message: String },
}

impl Outcome {
    /// Failure outcome with a message
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    /// True for `Success`
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl From<Result<Completion>> for Outcome {
    fn from(result: Result<Completion>) -> Self {
        match result {
            Ok(completion) => Self::Success(completion),
            Err(e) => Self::failure(e.failure_kind(), e.to_string()),
        }
    }
}

/// Capability shared by every provider: answer a prompt with a given model
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Provider identifier this adapter serves
    fn provider(&self) -> &str;

    /// Send `prompt` to `model` and report the outcome; never panics on API errors
    async fn answer(&self, model: &str, prompt: &str) -> Outcome;
}

/// Adapters keyed by provider identifier
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn ProviderAdapter>>,
}

impl AdapterRegistry {
    /// Registry without adapters
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the built-in adapters, sharing one HTTP client
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let registry = Self::new()
            .with(OpenAIAdapter::new(client.clone(), config))
            .with(AnthropicAdapter::new(client.clone(), config))
            .with(GoogleAdapter::new(client, config))
            .with(CodeGptAdapter::new(config));

        debug!(providers = registry.adapters.len(), "Adapter registry ready");
        Ok(registry)
    }

    /// Add an adapter under its own provider name
    pub fn with(self, adapter: impl ProviderAdapter + 'static) -> Self {
        let provider = adapter.provider().to_string();
        self.with_shared(provider, Arc::new(adapter))
    }

    /// Add an already shared adapter under an explicit provider name
    pub fn with_shared(mut self, provider: impl Into<String>, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.insert(provider.into(), adapter);
        self
    }

    /// Adapter serving `provider`
    pub fn get(&self, provider: &str) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(provider).cloned()
    }

    /// True when an adapter serves `provider`
    pub fn contains(&self, provider: &str) -> bool {
        self.adapters.contains_key(provider)
    }
}

/// Look up a required credential or fail with `MissingCredential`
fn require_credential<'a>(provider: &str, key: Option<&'a str>) -> Result<&'a str> {
    key.ok_or_else(|| AppError::MissingCredential {
        provider: provider.to_string(),
        var: credential_var(provider)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}_API_KEY", provider.to_uppercase())),
    })
}

/// Vendor error body, `{"error": {"message": ...}}` for all three HTTP providers
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Read a response body, turning non-2xx statuses into `ApiError`
async fn read_json<T: DeserializeOwned>(provider: &str, response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(api_error(provider, status, &body));
    }

    Ok(serde_json::from_str(&body)?)
}

fn api_error(provider: &str, status: StatusCode, body: &str) -> AppError {
    let message = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(error_response) => error_response.error.message,
        Err(_) => format!("API request failed with status {}: {}", status, body),
    };

    AppError::ApiError {
        provider: provider.to_string(),
        message,
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
