//! Ember display simulator
//!
//! Runs the kiln display on the terminal instead of an OLED.
//!
//! # Usage
//!
//! ```bash
//! # Everything: icons, logo, pottery, status screens
//! ember-sim
//!
//! # One demo, redrawing in place
//! ember-sim --test pottery --ansi
//!
//! # Custom icon directory and config
//! ember-sim --icon-dir ./images/hex --config kiln.toml
//!
//! # Verbose logging
//! RUST_LOG=debug ember-sim
//! ```

use std::io;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};

use ember_core::compose::Framebuffer;
use ember_core::traits::{CancelToken, Clock, DisplaySurface};
use ember_core::Display;
use ember_host::{demo, signal};
use ember_host::{
    CancelFlag, Deadline, HostConfig, IconLibrary, ScriptedSource, StatusUpdater, StdClock,
    StdDelay, TerminalSurface,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Test {
    All,
    Icons,
    Logo,
    Pottery,
    Status,
}

/// Ember display simulator - kiln display demos on the terminal
#[derive(Parser, Debug)]
#[command(name = "ember-sim")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Demo to run
    #[arg(short = 't', long, value_enum, default_value = "all")]
    test: Test,

    /// Configuration file path
    #[arg(short = 'c', long, env = "EMBER_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Icon directory (overrides the config file)
    #[arg(short = 'i', long, env = "EMBER_ICON_DIR", value_name = "PATH")]
    icon_dir: Option<PathBuf>,

    /// Status screens to show in the status demo
    #[arg(long, default_value_t = 3)]
    cycles: u32,

    /// Redraw in place with ANSI escapes
    #[arg(long)]
    ansi: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "EMBER_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "ember_sim={level},ember_host={level},ember_core={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let mut config = match &args.config {
        Some(path) => HostConfig::load(path)
            .with_context(|| format!("Failed to load config: {path:?}"))?,
        None => HostConfig::default(),
    };
    if let Some(dir) = args.icon_dir.clone() {
        config.icon_dir = dir;
    }

    if !config.display.enabled {
        info!("Display disabled in config");
        return Ok(());
    }

    let (width, height) = (config.display.width, config.display.height);
    let mut surface = TerminalSurface::new(io::stdout(), width, height).with_ansi(args.ansi);
    surface
        .clear()
        .map_err(|e| anyhow!("Failed to clear terminal: {e:?}"))?;

    let cancel = CancelFlag::new();
    if let Err(e) = signal::cancel_on_shutdown(cancel.clone()) {
        warn!(error = %e, "Shutdown signals unavailable, demos run to completion");
    }

    let result = run(&args, &config, &mut surface, &cancel);
    blank(&mut surface, width, height);
    result
}

/// Run the selected demos, stopping between them once `cancel` fires
fn run<S: DisplaySurface>(
    args: &Args,
    config: &HostConfig,
    surface: S,
    cancel: &CancelFlag,
) -> Result<()> {
    let mut display = Display::new(surface, config.display.clone());
    info!(
        width = config.display.width,
        height = config.display.height,
        icons = ?config.icon_dir,
        "Display initialized"
    );

    let mut library = IconLibrary::from_config(&config.icon_dir, &config.display);
    let mut delay = StdDelay;
    let clock = StdClock::new();
    let selected = |test: Test| {
        (args.test == Test::All || args.test == test) && !cancel.is_cancelled()
    };

    if selected(Test::Icons) {
        demo::icons(&mut display, &mut library, &mut delay, cancel)
            .map_err(|e| anyhow!("Icon demo failed: {e:?}"))?;
    }

    if selected(Test::Logo) {
        let state = demo::logo(&mut display, &mut library, &mut delay, &clock, cancel)
            .map_err(|e| anyhow!("Logo demo failed: {e:?}"))?;
        info!(?state, "Logo demo done");
    }

    if selected(Test::Pottery) {
        let state = demo::pottery(&mut display, &mut library, &mut delay, &clock, cancel)
            .map_err(|e| anyhow!("Pottery demo failed: {e:?}"))?;
        info!(?state, "Pottery demo done");
    }

    if selected(Test::Status) {
        let source = ScriptedSource::new(demo::sample_snapshots());
        let mut updater = StatusUpdater::new(display, source, delay);
        if let Err(e) = updater.banner() {
            error!(error = %e, "Failed to show banner");
        }
        let run_ms = args.cycles.saturating_mul(updater.interval_ms());
        let deadline = Deadline::after(&clock, run_ms);
        let cycles = updater.run(&(cancel, deadline));
        info!(cycles, elapsed_ms = clock.now_ms(), "Status demo done");
    }

    if cancel.is_cancelled() {
        info!("Stopped early");
    }
    Ok(())
}

/// Leave the screen dark, whatever happened before
fn blank<S: DisplaySurface>(surface: &mut S, width: u32, height: u32) {
    let result = surface
        .clear()
        .and_then(|_| surface.transmit(&Framebuffer::new(width, height)));
    if let Err(e) = result {
        error!(error = ?e, "Failed to clear display");
    }
}
