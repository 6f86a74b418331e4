//! CodeGPT placeholder adapter
//!
//! There is no public API wired up for CodeGPT yet, so this adapter simulates
//! one: it waits for the configured latency and echoes the prompt back. It
//! runs with or without `CODEGPT_API_KEY`.

use super::{Completion, Outcome, ProviderAdapter};
use crate::config::Config;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

const PROVIDER: &str = "codegpt";

/// Simulated CodeGPT provider; answers locally after a fixed delay
pub struct CodeGptAdapter {
    api_key: Option<String>,
    latency: Duration,
}

impl CodeGptAdapter {
    /// Adapter using the configured simulated latency
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.credential(PROVIDER).map(str::to_string),
            latency: Duration::from_millis(config.codegpt_latency_ms),
        }
    }
}

#[async_trait]
impl ProviderAdapter for CodeGptAdapter {
    fn provider(&self) -> &str {
        PROVIDER
    }

    #[instrument(skip(self, prompt), fields(provider = PROVIDER))]
    async fn answer(&self, _model: &str, prompt: &str) -> Outcome {
        if self.api_key.is_none() {
            debug!("No CODEGPT_API_KEY set, continuing with simulated response");
        }

        tokio::time::sleep(self.latency).await;

        let text = format!("CodeGPT response for: {}", prompt);
        Outcome::Success(Completion::estimated(prompt, text))
    }
}
