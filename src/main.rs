#![forbid(unsafe_code)]

mod clock;
mod color;
mod config;
mod constants;
mod displays;
mod fonts;
mod gui;
mod snapping;
mod x11_utils;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{Level as TraceLevel, info, warn};
use tracing_subscriber::FmtSubscriber;

use config::{JsonFileBackend, SettingsStore};
use displays::{DisplayManager, DisplaySource, NoDisplays};
use x11_utils::X11Displays;

#[derive(Parser, Debug)]
#[command(name = "desktop-clock", version, about = "Borderless always-on-top desktop clock")]
struct Cli {
    /// Settings file to use instead of the one in the user config directory
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// trace, debug, info, warn or error (overrides LOG_LEVEL)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn parse_log_level(level: &str) -> TraceLevel {
    match level.to_lowercase().as_str() {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = parse_log_level(
        &cli.log_level
            .clone()
            .or_else(|| std::env::var("LOG_LEVEL").ok())
            .unwrap_or_else(|| "info".to_string()),
    );
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let settings_path = cli.settings.unwrap_or_else(JsonFileBackend::default_path);
    info!(path = %settings_path.display(), "Using settings file");
    let store = SettingsStore::load(Box::new(JsonFileBackend::new(settings_path)));

    let source: Box<dyn DisplaySource> = match X11Displays::connect() {
        Ok(source) => Box::new(source),
        Err(e) => {
            warn!(error = ?e, "Display enumeration unavailable, placement disabled");
            Box::new(NoDisplays)
        }
    };
    let displays = DisplayManager::new(source);

    gui::run_gui(store, displays)
}
