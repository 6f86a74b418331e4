//! Interactive comparison loop

use crate::catalog::Selection;
use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::dispatcher::Dispatcher;
use crate::error::Result;
use crate::questions::QuestionBank;
use crate::session::ComparisonSession;
use crate::ui::{self, QueryKind, Status, ViewChoice};
use colored::Colorize;
use tracing::info;

/// Run the select → query → compare → review loop until the user exits
pub async fn run(config: &Config, dispatcher: &Dispatcher) -> Result<()> {
    ui::clear_screen();
    ui::show_welcome();

    let (bank, bank_error) = QuestionBank::load_or_empty(&config.questions_path).await;
    if let Some(e) = bank_error {
        ui::display_error(&e.to_string());
    }

    let providers = ui::select_providers(dispatcher.catalog())?;
    let mut selections = Vec::with_capacity(providers.len());
    for provider in providers {
        let model = ui::select_model(dispatcher.catalog(), &provider)?;
        selections.push(Selection::new(provider, model));
    }

    println!("{}", "Selected models:".green().bold());
    for selection in &selections {
        println!("• {}", selection);
    }

    let mut session = ComparisonSession::new(selections);
    info!(session = %session.id, models = session.selections.len(), "Comparison session started");

    loop {
        session.clear();
        let waiting = Dashboard::build(&session.selections, None, config.truncate_chars);
        ui::show_dashboard(&waiting, Status::Ready);

        let query = match ui::select_query_kind()? {
            QueryKind::Exit => break,
            QueryKind::Predefined => match ui::select_question(&bank)? {
                Some(question) => question,
                None => ui::get_input("Enter your query (or type 'exit' to quit)")?,
            },
            QueryKind::Custom => ui::get_input("Enter your query (or type 'exit' to quit)")?,
        };

        if query.trim().eq_ignore_ascii_case("exit") {
            break;
        }

        ui::show_dashboard(&waiting, Status::Processing);
        let spinner = ui::create_spinner("Waiting for all models to answer...");
        let dispatched = dispatcher.dispatch(&session.selections, &query).await;
        spinner.finish_and_clear();

        let results = match dispatched {
            Ok(results) => results,
            Err(e) => {
                ui::display_error(&e.to_string());
                ui::wait_for_enter("Press Enter to continue")?;
                continue;
            }
        };
        session.record(query, results);

        let dashboard = Dashboard::build(&session.selections, session.results(), config.truncate_chars);
        ui::show_dashboard(&dashboard, Status::ResultsReady);

        review_responses(&session, &dashboard)?;

        if !ui::confirm_continue()? {
            break;
        }
    }

    info!(session = %session.id, "Comparison session ended");
    Ok(())
}

/// Let the user read full responses until they are done
fn review_responses(session: &ComparisonSession, dashboard: &Dashboard) -> Result<()> {
    let count = session.selections.len();

    loop {
        match ui::select_view(count)? {
            ViewChoice::Done => return Ok(()),
            ViewChoice::All => {
                for index in 0..count {
                    if let Some((selection, result)) = session.full_response(index) {
                        let title = format!(
                            "{} - {} (Full Response {}/{})",
                            selection.provider,
                            selection.model,
                            index + 1,
                            count
                        );
                        ui::show_full_response(&title, &result.text);
                    }

                    if index + 1 < count {
                        ui::wait_for_enter(&format!(
                            "Press Enter to view next response ({}/{})",
                            index + 2,
                            count
                        ))?;
                    } else {
                        ui::wait_for_enter("Press Enter to return to response selection")?;
                    }
                }
            }
            ViewChoice::One(index) => {
                if let Some((selection, result)) = session.full_response(index) {
                    let title = format!("{} - {} (Full Response)", selection.provider, selection.model);
                    ui::show_full_response(&title, &result.text);
                    ui::wait_for_enter("Press Enter to return to response selection")?;
                }
            }
        }

        ui::show_dashboard(dashboard, Status::Reviewing);
    }
}
