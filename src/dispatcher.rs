//! Concurrent fan-out of one prompt to every selected provider

use crate::catalog::{ProviderCatalog, Selection};
use crate::config::Config;
use crate::error::{AppError, FailureKind, Result};
use crate::providers::{AdapterRegistry, Outcome};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Normalized outcome of one selection's call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Provider that was queried
    pub provider: String,
    /// Model that was queried
    pub model: String,
    /// Response text, or `Error: ...` when the call failed
    pub text: String,
    /// Wall-clock seconds from dispatch to completion
    pub elapsed_time: f64,
    /// Prompt tokens, zero on failure
    pub tokens_in: u32,
    /// Response tokens, zero on failure
    pub tokens_out: u32,
    /// Set when `text` carries an error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

impl QueryResult {
    /// Build the record for `selection` from an adapter outcome
    pub fn from_outcome(selection: &Selection, outcome: Outcome, elapsed_time: f64) -> Self {
        let (text, tokens_in, tokens_out, failure) = match outcome {
            Outcome::Success(completion) => (
                completion.text,
                completion.tokens_in,
                completion.tokens_out,
                None,
            ),
            Outcome::Failure { kind, message } => (format!("Error: {}", message), 0, 0, Some(kind)),
        };

        Self {
            provider: selection.provider.clone(),
            model: selection.model.clone(),
            text,
            elapsed_time,
            tokens_in,
            tokens_out,
            failure,
        }
    }

    /// True when `text` carries an error message
    pub fn is_error(&self) -> bool {
        self.failure.is_some()
    }
}

/// Sends a prompt to several providers at once
#[derive(Clone)]
pub struct Dispatcher {
    catalog: Arc<ProviderCatalog>,
    registry: AdapterRegistry,
}

impl Dispatcher {
    /// Dispatcher over an explicit catalog and adapter set
    pub fn new(catalog: Arc<ProviderCatalog>, registry: AdapterRegistry) -> Self {
        Self { catalog, registry }
    }

    /// Dispatcher over the built-in catalog and HTTP adapters
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            Arc::new(ProviderCatalog::builtin()),
            AdapterRegistry::from_config(config)?,
        ))
    }

    /// Catalog selections are validated against
    pub fn catalog(&self) -> &ProviderCatalog {
        &self.catalog
    }

    /// Query every selection concurrently.
    ///
    /// All selections are validated before any call starts. Per-call failures
    /// come back in-band as `Error: ...` results; the returned vector always
    /// lines up with `selections`.
    #[instrument(skip(self, selections, prompt), fields(count = selections.len()))]
    pub async fn dispatch(&self, selections: &[Selection], prompt: &str) -> Result<Vec<QueryResult>> {
        if prompt.trim().is_empty() {
            return Err(AppError::EmptyPrompt);
        }

        let mut adapters = Vec::with_capacity(selections.len());
        for selection in selections {
            self.catalog.validate(selection)?;
            let adapter = self
                .registry
                .get(&selection.provider)
                .ok_or_else(|| AppError::InvalidSelection {
                    provider: selection.provider.clone(),
                    model: selection.model.clone(),
                })?;
            adapters.push(adapter);
        }

        info!("Dispatching query to {} model(s)", selections.len());

        let handles: Vec<_> = selections
            .iter()
            .cloned()
            .zip(adapters)
            .map(|(selection, adapter)| {
                let prompt = prompt.to_string();
                let started = Instant::now();
                let handle = tokio::spawn(async move {
                    let outcome = adapter.answer(&selection.model, &prompt).await;
                    (outcome, started.elapsed().as_secs_f64())
                });
                (handle, started)
            })
            .collect();

        // Joined in input order; a panicked task only fails its own slot
        let outcomes = join_all(handles.into_iter().map(|(handle, started)| async move {
            handle.await.unwrap_or_else(|e| {
                let message = AppError::TaskFailed(e.to_string()).to_string();
                (
                    Outcome::failure(FailureKind::Transport, message),
                    started.elapsed().as_secs_f64(),
                )
            })
        }))
        .await;

        let results: Vec<QueryResult> = selections
            .iter()
            .zip(outcomes)
            .map(|(selection, (outcome, elapsed))| {
                let result = QueryResult::from_outcome(selection, outcome, elapsed);
                if result.is_error() {
                    warn!(provider = %result.provider, model = %result.model, "{}", result.text);
                } else {
                    debug!(
                        provider = %result.provider,
                        model = %result.model,
                        elapsed = result.elapsed_time,
                        "Response received"
                    );
                }
                result
            })
            .collect();

        Ok(results)
    }
}
