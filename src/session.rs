//! In-memory state of one comparison session

use crate::catalog::Selection;
use crate::dispatcher::QueryResult;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Selections plus the most recent round of results
#[derive(Debug, Clone)]
pub struct ComparisonSession {
    /// Session identifier, used in logs
    pub id: Uuid,
    /// When the selections were made
    pub started_at: DateTime<Utc>,
    /// Models being compared, in column order
    pub selections: Vec<Selection>,
    last_prompt: Option<String>,
    last_results: Option<Vec<QueryResult>>,
}

impl ComparisonSession {
    /// Start a session for the chosen models
    pub fn new(selections: Vec<Selection>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            selections,
            last_prompt: None,
            last_results: None,
        }
    }

    /// Replace the previous round with a new prompt and its results
    pub fn record(&mut self, prompt: impl Into<String>, results: Vec<QueryResult>) {
        self.last_prompt = Some(prompt.into());
        self.last_results = Some(results);
    }

    /// Forget the previous round
    pub fn clear(&mut self) {
        self.last_prompt = None;
        self.last_results = None;
    }

    /// Prompt of the latest round
    pub fn last_prompt(&self) -> Option<&str> {
        self.last_prompt.as_deref()
    }

    /// Results of the latest round
    pub fn results(&self) -> Option<&[QueryResult]> {
        self.last_results.as_deref()
    }

    /// Selection and untruncated result at `index` of the last round
    pub fn full_response(&self, index: usize) -> Option<(&Selection, &QueryResult)> {
        let result = self.last_results.as_ref()?.get(index)?;
        Some((self.selections.get(index)?, result))
    }
}
