//! CLI interface and command handling

use crate::catalog::Selection;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// LLM Wars - send one prompt to several LLMs and compare the answers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute (defaults to the interactive comparison)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging
    #[arg(short, long, env = "LLM_WARS_DEBUG")]
    pub debug: bool,

    /// Configuration file path
    #[arg(short, long, env = "LLM_WARS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Question bank file
    #[arg(short, long)]
    pub questions: Option<PathBuf>,

    /// Characters of each response shown in the dashboard
    #[arg(short, long)]
    pub truncate: Option<usize>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pick providers and compare their answers interactively
    Compare,

    /// Send a single query to the given models and print the results
    Query {
        /// The query to send
        message: String,

        /// Model to query as provider:model (repeat for up to 4 models)
        #[arg(short, long = "select", required = true)]
        selections: Vec<Selection>,

        /// Output format (text, json, markdown)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List available providers and models
    Models,
}

/// Output format of the one-shot `query` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Dashboard table
    Text,
    /// Prompt, timestamp and results as JSON
    Json,
    /// One section per model
    Markdown,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Markdown => write!(f, "markdown"),
        }
    }
}
