// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod catalog;
mod config;
mod error;
mod file;
mod flow;
mod input;
mod render;
mod state;
mod ui;

use app::App;
use config::Settings;

/// Pick a statistical test and get the R code to run it.
#[derive(Debug, Parser)]
#[command(name = "statguide", version)]
struct Cli {
    /// Catalog JSON file with the test definitions
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// RON settings file layered over the per-user one
    #[arg(long)]
    config: Option<PathBuf>,

    /// Name of the data frame used in the generated code
    #[arg(long)]
    frame: Option<String>,

    /// Write the effective settings to this file and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(catalog) = cli.catalog {
        settings.catalog_path = catalog;
    }
    if let Some(frame) = cli.frame.filter(|name| !name.trim().is_empty()) {
        settings.default_frame_name = frame;
    }

    if let Some(path) = cli.write_config {
        settings.save(&path)?;
        println!("Settings written to {}", path.display());
        return Ok(());
    }

    init_logging(&settings);
    info!(catalog = %settings.catalog_path.display(), "starting statguide");

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::new(&settings);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("statguide stopped");
    result
}

/// The terminal belongs to the UI, so log lines go to a file. `RUST_LOG`
/// wins over the configured level.
fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false);

    match settings.log_file.as_deref().and_then(open_log_file) {
        Some(file) => builder.with_writer(Mutex::new(file)).init(),
        None => builder.with_writer(io::sink).init(),
    }
}

fn open_log_file(path: &Path) -> Option<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}
