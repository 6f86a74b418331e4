//! Provider catalog and user selections

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Read-only mapping from provider name to its ordered model names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCatalog {
    entries: Vec<(String, Vec<String>)>,
}

impl ProviderCatalog {
    /// Build a catalog from (provider, models) pairs, keeping their order
    pub fn new<P, M, I>(entries: impl IntoIterator<Item = (P, I)>) -> Self
    where
        P: Into<String>,
        M: Into<String>,
        I: IntoIterator<Item = M>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(provider, models)| {
                    (provider.into(), models.into_iter().map(Into::into).collect())
                })
                .collect(),
        }
    }

    /// The providers and models shipped with the tool
    pub fn builtin() -> Self {
        Self::new([
            ("openai", vec!["gpt-4o", "gpt-4-turbo", "gpt-3.5-turbo"]),
            (
                "anthropic",
                vec![
                    "claude-3-opus-20240229",
                    "claude-3-sonnet-20240229",
                    "claude-3-haiku-20240307",
                ],
            ),
            (
                "google",
                vec!["gemini-1.5-pro", "gemini-1.5-flash", "gemini-1.0-pro"],
            ),
            ("codegpt", vec!["codegpt-latest"]),
        ])
    }

    /// Provider names in catalog order
    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(provider, _)| provider.as_str())
    }

    /// Models offered by a provider, if the provider is known
    pub fn models(&self, provider: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == provider)
            .map(|(_, models)| models.as_slice())
    }

    /// True when `provider` is in the catalog
    pub fn contains_provider(&self, provider: &str) -> bool {
        self.models(provider).is_some()
    }

    /// Check that a selection names a known provider and one of its models
    pub fn validate(&self, selection: &Selection) -> Result<()> {
        let known = self
            .models(&selection.provider)
            .map_or(false, |models| models.iter().any(|m| *m == selection.model));

        if known {
            Ok(())
        } else {
            Err(AppError::InvalidSelection {
                provider: selection.provider.clone(),
                model: selection.model.clone(),
            })
        }
    }

    /// Number of providers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no providers are defined
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ProviderCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// A (provider, model) pair picked for a comparison
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    /// Provider identifier, e.g. `openai`
    pub provider: String,
    /// Model identifier within the provider
    pub model: String,
}

impl Selection {
    /// Pair a provider with one of its models
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.provider, self.model)
    }
}

impl FromStr for Selection {
    type Err = String;

    /// Parse `provider:model`; the model part may itself contain colons
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (provider, model) = s
            .split_once(':')
            .ok_or_else(|| format!("expected provider:model, got '{}'", s))?;
        let (provider, model) = (provider.trim(), model.trim());

        if provider.is_empty() || model.is_empty() {
            return Err(format!("expected provider:model, got '{}'", s));
        }

        Ok(Self::new(provider, model))
    }
}
