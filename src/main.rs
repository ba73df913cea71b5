//! Showcase TUI - terminal client for the university project showcase
//!
//! A Ratatui-based client for submitting project applications, reviewing
//! them as a coordinator and approving account registrations through the
//! showcase REST backend.

mod api;
mod app;
mod config;
mod platform;
mod state;
mod storage;
mod store;
mod ui;

use anyhow::Result;
use api::ApiClient;
use app::App;
use config::ClientConfig;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storage::LocalStorage;
use tracing::{info, warn};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "showcase_tui=info";

#[tokio::main]
async fn main() -> Result<()> {
    let (config, config_error) = match ClientConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (ClientConfig::default(), Some(e)),
    };

    init_logging(&config);
    if let Some(e) = config_error {
        warn!("Failed to load config, using defaults: {}", e);
    }
    if !ClientConfig::exists() {
        if let Err(e) = config.save() {
            warn!("Failed to write default config: {}", e);
        }
    }

    let base_url = config.api_base_url();
    info!("Using showcase API at {}", base_url);
    let storage = Arc::new(LocalStorage::open_default());
    let api = Arc::new(ApiClient::new(base_url, storage)?);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run
    let mut app = App::new(api, &config);
    app.start();
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

/// Log to a file in the data dir; stderr would draw over the alternate screen
fn init_logging(config: &ClientConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| {
            tracing_subscriber::EnvFilter::try_new(
                config.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER),
            )
        })
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    let log_file = config::project_dirs().and_then(|dirs| {
        let dir = dirs.data_dir();
        fs::create_dir_all(dir).ok()?;
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("showcase-tui.log"))
            .ok()
    });

    let writer = match log_file {
        Some(file) => BoxMakeWriter::new(Mutex::new(file)),
        None => BoxMakeWriter::new(io::stderr),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Apply finished requests before drawing
        app.drain_completions();

        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Resize(_width, _height) => {
                    // Layout is recalculated on the next draw
                }
                _ => {}
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
