//! Configuration management for LLM Wars

use crate::error::{AppError, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variable holding each provider's secret
pub const CREDENTIAL_VARS: &[(&str, &str)] = &[
    ("openai", "OPENAI_API_KEY"),
    ("anthropic", "ANTHROPIC_API_KEY"),
    ("google", "GOOGLE_API_KEY"),
    ("codegpt", "CODEGPT_API_KEY"),
];

/// Name of the environment variable that carries `provider`'s secret
pub fn credential_var(provider: &str) -> Option<&'static str> {
    CREDENTIAL_VARS
        .iter()
        .find(|(name, _)| *name == provider)
        .map(|(_, var)| *var)
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider name to API key
    #[serde(default)]
    pub credentials: BTreeMap<String, String>,

    /// Base URLs for each HTTP provider
    #[serde(default)]
    pub endpoints: Endpoints,

    /// Maximum tokens requested per response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Characters of each response shown in the dashboard
    #[serde(default = "default_truncate_chars")]
    pub truncate_chars: usize,

    /// Question bank location
    #[serde(default = "default_questions_path")]
    pub questions_path: PathBuf,

    /// Simulated latency of the CodeGPT placeholder provider
    #[serde(default = "default_codegpt_latency")]
    pub codegpt_latency_ms: u64,

    /// Enable debug logging
    #[serde(default)]
    pub debug: bool,
}

/// Provider API base URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// OpenAI API base URL
    #[serde(default = "default_openai_url")]
    pub openai: String,
    /// Anthropic API base URL
    #[serde(default = "default_anthropic_url")]
    pub anthropic: String,
    /// Google Generative Language API base URL
    #[serde(default = "default_google_url")]
    pub google: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            openai: default_openai_url(),
            anthropic: default_anthropic_url(),
            google: default_google_url(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            credentials: BTreeMap::new(),
            endpoints: Endpoints::default(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout(),
            truncate_chars: default_truncate_chars(),
            questions_path: default_questions_path(),
            codegpt_latency_ms: default_codegpt_latency(),
            debug: false,
        }
    }
}

impl Config {
    /// Load configuration from the config file and the process environment
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path).await?,
            None => match Self::config_path() {
                Ok(path) => Self::load_from_file(&path).await.unwrap_or_default(),
                Err(_) => Self::default(),
            },
        };

        config.apply_env(|name| std::env::var(name).ok())?;

        Ok(config)
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (provider, var) in CREDENTIAL_VARS {
            if let Some(key) = lookup(var).filter(|key| !key.trim().is_empty()) {
                self.credentials.insert(provider.to_string(), key);
            }
        }

        if let Some(url) = lookup("OPENAI_BASE_URL") {
            self.endpoints.openai = url;
        }

        if let Some(url) = lookup("ANTHROPIC_BASE_URL") {
            self.endpoints.anthropic = url;
        }

        if let Some(url) = lookup("GOOGLE_BASE_URL") {
            self.endpoints.google = url;
        }

        if let Some(max_tokens) = lookup("LLM_WARS_MAX_TOKENS") {
            self.max_tokens = max_tokens
                .parse()
                .map_err(|_| AppError::ConfigError("Invalid max_tokens value".to_string()))?;
        }

        Ok(())
    }

    /// Load configuration from a TOML file; a missing file yields defaults
    pub async fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Self =
            toml::from_str(&content).map_err(|e| AppError::ConfigError(e.to_string()))?;

        Ok(config)
    }

    /// Get the configuration file path
    fn config_path() -> Result<PathBuf> {
        let mut path = config_dir()
            .ok_or_else(|| AppError::ConfigError("Could not find config directory".to_string()))?;
        path.push("llm-wars");
        path.push("config.toml");
        Ok(path)
    }

    /// Credential configured for a provider; blank values count as missing
    pub fn credential(&self, provider: &str) -> Option<&str> {
        self.credentials
            .get(provider)
            .map(String::as_str)
            .filter(|key| !key.trim().is_empty())
    }

    /// Builder-style credential setter, mostly for tests and embedding
    pub fn with_credential(mut self, provider: impl Into<String>, key: impl Into<String>) -> Self {
        self.credentials.insert(provider.into(), key.into());
        self
    }
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_timeout() -> u64 {
    60
}

fn default_truncate_chars() -> usize {
    200
}

fn default_questions_path() -> PathBuf {
    PathBuf::from("questions.json")
}

fn default_codegpt_latency() -> u64 {
    1000
}

fn default_openai_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_anthropic_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_google_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}
