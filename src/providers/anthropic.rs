//! Anthropic messages adapter

use super::{join_url, read_json, require_credential, Completion, Outcome, ProviderAdapter};
use crate::config::Config;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const PROVIDER: &str = "anthropic";
const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

/// Adapter for `POST /v1/messages`
pub struct AnthropicAdapter {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    max_tokens: u32,
}

impl AnthropicAdapter {
    /// Adapter reading the Anthropic key and base URL from `config`
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.endpoints.anthropic.clone(),
            api_key: config.credential(PROVIDER).map(str::to_string),
            max_tokens: config.max_tokens,
        }
    }

    #[instrument(skip(self, prompt), fields(provider = PROVIDER))]
    async fn complete(&self, model: &str, prompt: &str) -> Result<Completion> {
        let api_key = require_credential(PROVIDER, self.api_key.as_deref())?;

        let request = MessagesRequest {
            model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        debug!("Sending messages request");

        let response = self
            .client
            .post(join_url(&self.base_url, "/v1/messages"))
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        let response: MessagesResponse = read_json(PROVIDER, response).await?;

        let text = response
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| AppError::EmptyResponse {
                provider: PROVIDER.to_string(),
            })?;

        Ok(Completion::new(
            text,
            response.usage.input_tokens,
            response.usage.output_tokens,
        ))
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn provider(&self) -> &str {
        PROVIDER
    }

    async fn answer(&self, model: &str, prompt: &str) -> Outcome {
        self.complete(model, prompt).await.into()
    }
}
