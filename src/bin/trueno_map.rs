//! trueno-map - braille terminal map viewer.
//!
//! Loads a GeoJSON file, projects it to Web Mercator and shows it as a
//! navigable braille map.
//!
//! Run: `trueno-map data/world.geo.json`

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::FmtSubscriber;

use trueno_map::tui::App;
use trueno_map::{Config, MapService};

/// Fallback data file, relative to the working directory.
const DEFAULT_DATA: &str = "data/globe.geo.json";

/// trueno-map: braille terminal map viewer
#[derive(Parser, Debug)]
#[command(name = "trueno-map")]
#[command(author = "PAIML Team")]
#[command(version)]
#[command(about = "Navigable braille map of GeoJSON line work in the terminal", long_about = None)]
struct Cli {
    /// GeoJSON file to display (default: data/globe.geo.json)
    data: Option<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write logs to this file (the terminal is taken by the map)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.log_file {
        init_logging(path, cli.verbose)?;
    }

    let config = load_config(cli.config.as_deref())?;
    let data = resolve_data(cli.data.as_deref())?;
    tracing::info!(data = %data.display(), "starting");

    let mut service = MapService::from_config(&config);
    service
        .load_geojson(&data, config.render.index)
        .with_context(|| format!("failed to load {}", data.display()))?;

    let mut app = App::new(&config, service)?;
    app.run()?;
    Ok(())
}

fn init_logging(path: &Path, verbosity: u8) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        })
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default tracing subscriber failed")?;
    Ok(())
}

/// An explicit config path must load; the default location is optional.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None => Ok(Config::default_path().map(Config::load_or_default).unwrap_or_default()),
    }
}

/// Use the given data file, falling back to the default one.
fn resolve_data(path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        eprintln!("Warning: data file not found: {}", path.display());
        eprintln!("Trying {DEFAULT_DATA}...");
    }
    let fallback = PathBuf::from(DEFAULT_DATA);
    if fallback.exists() {
        Ok(fallback)
    } else {
        bail!("no data file: pass a GeoJSON path or provide {DEFAULT_DATA}")
    }
}
