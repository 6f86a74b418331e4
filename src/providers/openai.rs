//! OpenAI chat completions adapter

use super::{join_url, read_json, require_credential, Completion, Outcome, ProviderAdapter};
use crate::config::Config;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const PROVIDER: &str = "openai";

/// A message in the request
#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// OpenAI API request
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
}

/// OpenAI API response
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Token usage information
#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// Adapter for `POST /v1/chat/completions`
pub struct OpenAIAdapter {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    max_tokens: u32,
}

impl OpenAIAdapter {
    /// Adapter reading the OpenAI key and base URL from `config`
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.endpoints.openai.clone(),
            api_key: config.credential(PROVIDER).map(str::to_string),
            max_tokens: config.max_tokens,
        }
    }

    #[instrument(skip(self, prompt), fields(provider = PROVIDER))]
    async fn complete(&self, model: &str, prompt: &str) -> Result<Completion> {
        let api_key = require_credential(PROVIDER, self.api_key.as_deref())?;

        let request = CompletionRequest {
            model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
        };

        debug!("Sending completion request");

        let response = self
            .client
            .post(join_url(&self.base_url, "/v1/chat/completions"))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let response: CompletionResponse = read_json(PROVIDER, response).await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::EmptyResponse {
                provider: PROVIDER.to_string(),
            })?
            .message
            .content
            .unwrap_or_default();

        Ok(match response.usage {
            Some(usage) => Completion::new(text, usage.prompt_tokens, usage.completion_tokens),
            None => Completion::estimated(prompt, text),
        })
    }
}

#[async_trait]
impl ProviderAdapter for OpenAIAdapter {
    fn provider(&self) -> &str {
        PROVIDER
    }

    async fn answer(&self, model: &str, prompt: &str) -> Outcome {
        self.complete(model, prompt).await.into()
    }
}
