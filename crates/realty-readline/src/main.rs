mod cli;
mod helper;
mod logging;
mod render;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Result, bail};
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tracing::{debug, warn};

use realty_core::session::{QuerySubmitter, SessionState};
use realty_infrastructure::RealtyPaths;
use realty_interaction::{HttpAnalysisClient, SessionController};

use crate::cli::Cli;
use crate::helper::{CliHelper, HELP_TEXT, ReplCommand};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    logging::init_logging(&config)?;

    let client = Arc::new(HttpAnalysisClient::new(&config)?);
    let controller = SessionController::new(client.clone(), config.request_timeout());
    debug!(endpoint = client.analyze_url(), timeout_secs = config.request_timeout_secs, "client ready");

    match cli.one_shot_query() {
        Some(text) => run_once(&controller, &text, cli.json).await,
        None => run_repl(&controller, &client).await,
    }
}

/// Runs a single query, prints the outcome and fails the process on error.
async fn run_once(controller: &SessionController, text: &str, json: bool) -> Result<()> {
    let mut submitter = QuerySubmitter::new();
    submitter.set_input(text);
    let Some(request_id) = submitter.submit(controller) else {
        bail!("query is empty");
    };

    match controller.wait_settled(request_id).await {
        SessionState::Success(result) if json => {
            println!("{}", serde_json::to_string_pretty(result.as_ref())?);
            Ok(())
        }
        SessionState::Error(message) => bail!(message),
        state => {
            println!("{}", render::render_state(&state));
            Ok(())
        }
    }
}

/// The interactive prompt. Each confirmed line is one query; the prompt
/// returns once that query has settled.
async fn run_repl(controller: &SessionController, client: &HttpAnalysisClient) -> Result<()> {
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    let history_file = RealtyPaths::history_file().ok();
    if let Some(path) = &history_file {
        let _ = rl.load_history(path);
    }

    println!("{}", "=== Real Estate Analysis ===".bright_magenta().bold());
    println!("{}", format!("Service: {}", client.analyze_url()).bright_black());
    println!(
        "{}",
        "Ask about a locality (e.g., Analyze Wakad), '/help' for commands, or 'quit' to exit."
            .bright_black()
    );
    println!();

    let mut submitter = QuerySubmitter::new();

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if let Some(command) = ReplCommand::parse(trimmed) {
                    let _ = rl.add_history_entry(trimmed);
                    run_command(command, controller, client).await;
                    continue;
                }

                submitter.set_input(line.as_str());
                let Some(request_id) = submitter.submit(controller) else {
                    continue;
                };
                let _ = rl.add_history_entry(trimmed);

                println!("{}", render::render_state(&controller.snapshot()));
                let started = Instant::now();
                let state = controller.wait_settled(request_id).await;
                debug!(elapsed_ms = started.elapsed().as_millis() as u64, state = state.label(), "query settled");

                println!("{}", render::render_state(&state));
                println!();
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    if let Some(path) = &history_file {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(err) = rl.save_history(path) {
            warn!(error = %err, "failed to save history");
        }
    }

    Ok(())
}

async fn run_command(command: ReplCommand, controller: &SessionController, client: &HttpAnalysisClient) {
    match command {
        ReplCommand::Help => println!("{}", HELP_TEXT.bright_black()),
        ReplCommand::Status => {
            let state = controller.snapshot();
            let detail = match &state {
                SessionState::Pending { query, .. } => format!(" ({query})"),
                SessionState::Success(result) => format!(
                    " ({} chart points, {} rows)",
                    result.chart_series.len(),
                    result.table_rows.len()
                ),
                SessionState::Error(message) => format!(" ({message})"),
                SessionState::Idle => String::new(),
            };
            println!("{}", format!("Session: {}{detail}", state.label()).bright_black());
        }
        ReplCommand::Upload(path) => match client.upload_dataset(&path).await {
            Ok(message) => println!("{}", message.green()),
            Err(err) => eprintln!("{}", format!("Upload failed: {err}").red()),
        },
        ReplCommand::Invalid(message) => println!("{}", message.yellow()),
    }
}
