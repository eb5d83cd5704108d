//! # ragq: A Terminal Client for RAG Question Answering
//!
//! This is the main entry point for the `ragq` binary. It resolves the
//! endpoint configuration, sets up file-based logging so the TUI stays
//! clean, and drives the terminal event loop.

mod app;
mod ui;

use std::fs::File;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use ragq::QueryClient;
use ratatui::crossterm::event::{self, Event, KeyEventKind};
use ratatui::{DefaultTerminal, Frame};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::app::App;

/// How long each event-loop tick waits for input before redrawing.
const TICK_RATE: Duration = Duration::from_millis(50);

#[derive(Parser, Debug)]
#[command(author, version, about = "Ask a retrieval QA service from the terminal", long_about = None)]
struct Cli {
    /// Full URL of the query endpoint
    #[arg(
        long,
        env = "RAGQ_API_URL",
        default_value = "http://localhost:8000/query"
    )]
    api_url: String,
    /// Initial retrieval count (k)
    #[arg(short = 'k', long, default_value_t = ragq::DEFAULT_RESULT_COUNT)]
    result_count: u32,
    /// Question text to prefill the input with
    #[arg(short, long)]
    question: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Log to a file; writing to stdout would fight the terminal UI.
    let log_file = File::create("ragq.log")?;
    let subscriber = fmt::Subscriber::builder()
        .with_writer(log_file)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    info!("using query endpoint {}", cli.api_url);

    let client = QueryClient::new(cli.api_url)?;
    let mut app = App::new(client);
    app.panel.set_result_count(cli.result_count);
    if let Some(question) = cli.question {
        app.panel.set_question(question);
    }

    let mut terminal = ratatui::init();
    terminal.clear()?;
    let result = run(&mut terminal, &mut app).await;
    ratatui::restore();
    result
}

/// Pump the terminal event loop until the user exits.
async fn run(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    while app.running {
        app.pump_completions();
        app.tick();
        terminal.draw(|frame: &mut Frame| ui::ui(frame, app))?;

        if event::poll(TICK_RATE)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    // Ensure any in-flight request is aborted before the terminal is gone.
    app.quit();
    Ok(())
}
