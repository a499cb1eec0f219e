mod action;
mod app;
mod assets;
mod config;
mod icons;
mod plate;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt};

use action::Action;
use app::App;
use config::Config;
use icons::{GlyphStyle, ImageManager};

/// Input poll interval; also how often font readiness is checked
const TICK: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "plate")]
#[command(about = "Today's Plate - nutrition progress in the terminal")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(long, default_value = "~/.config/todays-plate/config.toml")]
    config: String,

    /// Theme preset (overrides config)
    #[arg(long)]
    theme: Option<String>,

    /// Draw icons with ascii glyphs
    #[arg(long)]
    ascii_icons: bool,

    /// Disable graphics-protocol images
    #[arg(long)]
    no_images: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the plate snapshot as JSON and exit
    #[arg(long)]
    print_snapshot: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let writer = match &cli.log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            BoxMakeWriter::new(std::sync::Mutex::new(file))
        }
        None => BoxMakeWriter::new(io::stderr),
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plate=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(cli.log_file.is_none()),
        )
        .init();

    // Load config
    let mut config = Config::load(&cli.config)?;
    if let Some(theme) = &cli.theme {
        config.appearance.theme = theme.clone();
    }
    if cli.ascii_icons {
        config.appearance.glyphs = GlyphStyle::Ascii;
    }
    if cli.no_images {
        config.images.enabled = false;
    }

    let snapshot = config.snapshot()?;
    tracing::info!("Plate '{}' with {} cards", snapshot.title, snapshot.cards.len());

    if cli.print_snapshot {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    // Graphics detection must happen before raw mode
    let mut images = if config.images_enabled() {
        ImageManager::new(config.assets.root.clone())
    } else {
        ImageManager::disabled()
    };
    images.preload(snapshot.image_refs());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state and start loading fonts
    let mut app = App::new(snapshot, config);
    app.mount();

    // Run main loop
    let result = run_app(&mut terminal, &mut app, &images);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    images: &ImageManager,
) -> Result<()> {
    loop {
        app.poll_assets();
        terminal.draw(|f| ui::draw(f, app, images))?;

        if event::poll(TICK)? {
            let event = event::read()?;
            if let Some(action) = Action::from_event(&event) {
                if !app.apply(action) {
                    return Ok(());
                }
            }
        }
    }
}
