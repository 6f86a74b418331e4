//! Predefined question bank loaded from JSON

use crate::error::{AppError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// How hard a predefined question is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Warm-up question
    Easy,
    /// Needs a few reasoning steps
    Medium,
    /// Expected to separate the models
    Hard,
    /// Any difficulty label this version does not know
    #[serde(other)]
    Unknown,
}

impl Difficulty {
    /// Lowercase name as written in the question file
    pub fn label(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Unknown => "unknown",
        }
    }
}

/// A single predefined prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Prompt sent to the models
    pub text: String,
    /// Difficulty tag shown in the picker
    pub difficulty: Difficulty,
}

/// A named group of questions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Display name
    pub name: String,
    /// Questions in file order
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// Categories keyed by their identifier, kept in file order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    /// Category identifier to category
    #[serde(default)]
    pub categories: IndexMap<String, Category>,
}

impl QuestionBank {
    /// Read a question bank file.
    ///
    /// A missing file is an empty bank; unreadable or malformed content is a
    /// `ConfigError`.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No question bank at {}", path.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content).map_err(|e| {
            AppError::ConfigError(format!("{} is not a valid question bank: {}", path.display(), e))
        })
    }

    /// Load, falling back to an empty bank on error.
    ///
    /// The error is logged and handed back so the caller can show it.
    pub async fn load_or_empty(path: &Path) -> (Self, Option<AppError>) {
        match Self::load(path).await {
            Ok(bank) => (bank, None),
            Err(e) => {
                warn!("Question bank unavailable: {}", e);
                (Self::default(), Some(e))
            }
        }
    }

    /// Parse question bank JSON
    pub fn parse(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// True when no categories are defined
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Categories in display order
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }
}
