use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use llm_wars::cli::{Cli, Commands, OutputFormat};
use llm_wars::config::{credential_var, Config};
use llm_wars::{shell, ui, Dispatcher, Selection};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; credentials may come from the real environment
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())
        .await
        .context("Failed to load configuration")?;
    apply_overrides(&mut config, &cli);
    init_tracing(config.debug);

    let dispatcher = Dispatcher::from_config(&config).context("Failed to set up providers")?;

    match cli.command {
        None | Some(Commands::Compare) => shell::run(&config, &dispatcher).await?,
        Some(Commands::Query {
            message,
            selections,
            format,
        }) => run_query(&config, &dispatcher, &message, &selections, format).await?,
        Some(Commands::Models) => list_models(&config, &dispatcher),
    }

    Ok(())
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("llm_wars=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("llm_wars=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if cli.debug {
        config.debug = true;
    }
    if let Some(path) = &cli.questions {
        config.questions_path = path.clone();
    }
    if let Some(truncate) = cli.truncate {
        config.truncate_chars = truncate;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_seconds = timeout;
    }
}

async fn run_query(
    config: &Config,
    dispatcher: &Dispatcher,
    message: &str,
    selections: &[Selection],
    format: OutputFormat,
) -> anyhow::Result<()> {
    let spinner = (format == OutputFormat::Text)
        .then(|| ui::create_spinner("Waiting for all models to answer..."));
    let results = dispatcher.dispatch(selections, message).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let results = results?;
    let output = ui::format_results(
        message,
        selections,
        &results,
        format,
        config.truncate_chars,
        ui::terminal_width(),
    )?;
    println!("{}", output);

    Ok(())
}

fn list_models(config: &Config, dispatcher: &Dispatcher) {
    let catalog = dispatcher.catalog();

    for provider in catalog.providers() {
        let key_state = match credential_var(provider) {
            Some(var) if config.credential(provider).is_none() => {
                format!("({} not set)", var).dimmed()
            }
            _ => "".normal(),
        };
        println!("{} {}", provider.cyan().bold(), key_state);
        for model in catalog.models(provider).unwrap_or_default() {
            println!("  {}", model);
        }
    }
}
