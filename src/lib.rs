//! LLM Wars - compare several LLM providers side by side

/// Providers and their models
pub mod catalog;
/// Command-line arguments
pub mod cli;
/// Configuration file and environment
pub mod config;
/// Side-by-side result display
pub mod dashboard;
/// Concurrent fan-out of one prompt
pub mod dispatcher;
/// Error types
pub mod error;
/// Terminal markdown rendering
pub mod markdown;
/// Provider adapters
pub mod providers;
/// Predefined question bank
pub mod questions;
/// Comparison session state
pub mod session;
/// Interactive comparison loop
pub mod shell;
/// Terminal prompts and output
pub mod ui;

pub use catalog::{ProviderCatalog, Selection};
pub use dispatcher::{Dispatcher, QueryResult};
pub use error::{AppError, FailureKind, Result};
