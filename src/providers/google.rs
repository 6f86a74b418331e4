//! Google Gemini `generateContent` adapter

use super::{join_url, read_json, require_credential, Completion, Outcome, ProviderAdapter};
use crate::config::Config;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const PROVIDER: &str = "google";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Adapter for `POST /v1beta/models/{model}:generateContent`.
///
/// The key travels in the `x-goog-api-key` header so it never appears in a
/// request URL. Token counts are estimated from character length rather
/// than read from the response.
pub struct GoogleAdapter {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleAdapter {
    /// Adapter reading the Google key and base URL from `config`
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.endpoints.google.clone(),
            api_key: config.credential(PROVIDER).map(str::to_string),
        }
    }

    #[instrument(skip(self, prompt), fields(provider = PROVIDER))]
    async fn complete(&self, model: &str, prompt: &str) -> Result<Completion> {
        let api_key = require_credential(PROVIDER, self.api_key.as_deref())?;

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let url = join_url(
            &self.base_url,
            &format!("/v1beta/models/{}:generateContent", model),
        );

        debug!("Sending generateContent request");

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let response: GenerateResponse = read_json(PROVIDER, response).await?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| AppError::EmptyResponse {
                provider: PROVIDER.to_string(),
            })?;

        Ok(Completion::estimated(prompt, text))
    }
}

#[async_trait]
impl ProviderAdapter for GoogleAdapter {
    fn provider(&self) -> &str {
        PROVIDER
    }

    async fn answer(&self, model: &str, prompt: &str) -> Outcome {
        self.complete(model, prompt).await.into()
    }
}
