//! User interface components and interactions

use crate::catalog::{ProviderCatalog, Selection};
use crate::cli::OutputFormat;
use crate::dashboard::Dashboard;
use crate::dispatcher::QueryResult;
use crate::questions::{Difficulty, QuestionBank};
use colored::{ColoredString, Colorize};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};

/// Most providers compared at once
pub const MAX_PROVIDERS: usize = 4;

const TITLE: &str = "LLM Wars - Comparison Dashboard";

/// How the next query is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Predefined,
    Custom,
    Exit,
}

/// What to do after results are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewChoice {
    Done,
    All,
    One(usize),
}

/// Status line under the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ready,
    Processing,
    ResultsReady,
    Reviewing,
}

impl Status {
    fn styled(&self) -> ColoredString {
        match self {
            Self::Ready => "Status: Ready for query".yellow(),
            Self::Processing => "Status: Processing query across all models...".yellow().bold(),
            Self::ResultsReady => "Status: Results ready. Choose an option below.".green(),
            Self::Reviewing => {
                "Status: Results ready. Continue viewing responses or proceed.".green()
            }
        }
    }
}

fn interaction_error(e: dialoguer::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}

/// Display the start-up banner
pub fn show_welcome() {
    println!("{}", "╔══════════════════════════════════════╗".magenta());
    println!(
        "{}",
        "║    LLM Wars - LLM Comparison Tool    ║".magenta().bold()
    );
    println!("{}", "╚══════════════════════════════════════╝".magenta());
    println!();
}

/// Let the user pick between one and four providers
pub fn select_providers(catalog: &ProviderCatalog) -> io::Result<Vec<String>> {
    let providers: Vec<&str> = catalog.providers().collect();

    loop {
        let chosen = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Select up to {} providers (space to toggle, enter to confirm)",
                MAX_PROVIDERS
            ))
            .items(&providers)
            .interact()
            .map_err(interaction_error)?;

        match chosen.len() {
            0 => display_error("Please select at least one provider"),
            n if n > MAX_PROVIDERS => {
                display_error(&format!("Select at most {} providers", MAX_PROVIDERS))
            }
            _ => return Ok(chosen.into_iter().map(|i| providers[i].to_string()).collect()),
        }
    }
}

/// Pick one of a provider's models
pub fn select_model(catalog: &ProviderCatalog, provider: &str) -> io::Result<String> {
    let models = catalog.models(provider).unwrap_or_default();

    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Choose a model for {}", provider))
        .items(models)
        .default(0)
        .interact()
        .map_err(interaction_error)?;

    Ok(models[index].clone())
}

/// Ask whether the next query is predefined, custom, or whether to quit
pub fn select_query_kind() -> io::Result<QueryKind> {
    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Query type")
        .items(&["Predefined question", "Custom query", "Exit"])
        .default(0)
        .interact()
        .map_err(interaction_error)?;

    Ok(match index {
        0 => QueryKind::Predefined,
        1 => QueryKind::Custom,
        _ => QueryKind::Exit,
    })
}

/// Walk the question bank; `None` means no question was picked
pub fn select_question(bank: &QuestionBank) -> io::Result<Option<String>> {
    clear_screen();

    if bank.is_empty() {
        display_error("No questions found in the question bank");
        return Ok(None);
    }

    let categories: Vec<_> = bank.categories().collect();
    let mut items: Vec<String> = categories
        .iter()
        .map(|category| format!("{} ({} questions)", category.name, category.questions.len()))
        .collect();
    items.push("Custom query".to_string());

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select a question category")
        .items(&items)
        .default(0)
        .interact()
        .map_err(interaction_error)?;

    let Some(category) = categories.get(choice) else {
        return get_input("Enter your custom query").map(Some);
    };

    if category.questions.is_empty() {
        display_error(&format!("{} has no questions", category.name));
        return Ok(None);
    }

    println!("\n{}", category.name.blue().bold());
    let items: Vec<String> = category
        .questions
        .iter()
        .enumerate()
        .map(|(i, question)| {
            format!(
                "{}. {} {}",
                i + 1,
                difficulty_tag(question.difficulty),
                preview(&question.text, 50)
            )
        })
        .collect();

    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Choose a question")
        .items(&items)
        .default(0)
        .interact()
        .map_err(interaction_error)?;

    Ok(Some(category.questions[index].text.clone()))
}

fn difficulty_tag(difficulty: Difficulty) -> ColoredString {
    let tag = format!("[{}]", difficulty.label());
    match difficulty {
        Difficulty::Easy => tag.green(),
        Difficulty::Medium => tag.yellow(),
        Difficulty::Hard => tag.red(),
        Difficulty::Unknown => tag.white(),
    }
}

/// First `limit` characters followed by an ellipsis
fn preview(text: &str, limit: usize) -> String {
    let head: String = text.chars().take(limit).collect();
    format!("{}...", head)
}

/// Get user input with a prompt
pub fn get_input(prompt: &str) -> io::Result<String> {
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact_text()
        .map_err(interaction_error)
}

/// Block until the user presses Enter
pub fn wait_for_enter(prompt: &str) -> io::Result<()> {
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map(|_| ())
        .map_err(interaction_error)
}

/// Clear the screen and draw the dashboard with a status line
pub fn show_dashboard(dashboard: &Dashboard, status: Status) {
    clear_screen();
    println!("{}", TITLE.magenta().bold());
    println!("{}", dashboard.render(terminal_width()));
    println!("{}", status.styled());
}

/// Ask which full responses to read
pub fn select_view(count: usize) -> io::Result<ViewChoice> {
    let mut items = vec!["Done viewing".to_string(), "All sequentially".to_string()];
    items.extend((1..=count).map(|i| format!("Model {}", i)));

    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("View responses")
        .items(&items)
        .default(0)
        .interact()
        .map_err(interaction_error)?;

    Ok(match index {
        0 => ViewChoice::Done,
        1 => ViewChoice::All,
        n => ViewChoice::One(n - 2),
    })
}

/// Show one untruncated response full screen
pub fn show_full_response(title: &str, text: &str) {
    clear_screen();
    let width = terminal_width();
    println!("{}", title.green().bold());
    println!("{}", "─".repeat(width).green());
    println!("{}", crate::markdown::render(text, width));
    println!("{}", "─".repeat(width).green());
}

/// Format one round of results for non-interactive output
pub fn format_results(
    prompt: &str,
    selections: &[Selection],
    results: &[QueryResult],
    format: OutputFormat,
    budget: usize,
    width: usize,
) -> serde_json::Result<String> {
    Ok(match format {
        OutputFormat::Text => Dashboard::build(selections, Some(results), budget).render(width),
        OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "prompt": prompt,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "results": results,
        }))?,
        OutputFormat::Markdown => {
            let mut output = format!("# LLM Wars Results\n\n**Prompt:** {}\n\n", prompt);
            for result in results {
                output.push_str(&format!(
                    "## {}: {}\n\n{}\n\n_Time: {:.2}s | Tokens in: {} | Tokens out: {}_\n\n",
                    result.provider,
                    result.model,
                    result.text,
                    result.elapsed_time,
                    result.tokens_in,
                    result.tokens_out
                ));
            }
            output
        }
    })
}

/// Ask whether to run another query
pub fn confirm_continue() -> io::Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Continue with another query?")
        .default(true)
        .interact()
        .map_err(interaction_error)
}

/// Terminal width, 80 when it cannot be detected
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(width, _)| width.0 as usize)
        .unwrap_or(80)
}

/// Display an error message
pub fn display_error(error: &str) {
    eprintln!("{} {}", "Error:".red().bold(), error);
}

/// Create a spinner for loading states
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Clear the terminal screen
pub fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
    let _ = io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_cuts_on_characters() {
        assert_eq!(preview("short", 50), "short...");
        assert_eq!(preview("ééééé", 2), "éé...");
    }
}
