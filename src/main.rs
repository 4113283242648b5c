//! expiry-scan - Desk scanning station for product expiration checks
//!
//! Looks up scanned barcodes in a product table and finds printed
//! expiration dates in text recognized from label photos.

mod analysis;
mod app;
mod catalog;
mod config;
mod scanner;
mod storage;
mod vision;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::app::ExpiryScanApp;
use crate::config::AppConfig;

/// expiry-scan - Barcode lookup and expiration date detection
#[derive(Parser, Debug)]
#[command(name = "expiry-scan")]
#[command(about = "Look up scanned products and detect printed expiration dates")]
struct Args {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Reference day for freshness (YYYY-MM-DD, defaults to today)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find an expiration date in recognized label text
    Extract {
        /// Recognized text fragments, in reading order
        texts: Vec<String>,

        /// JSON file of OCR results from an external engine
        #[arg(long)]
        ocr_json: Option<PathBuf>,

        /// Ignore OCR results below this confidence
        #[arg(long)]
        min_confidence: Option<f32>,
    },
    /// Look up a single barcode in the product catalog
    Lookup {
        code: String,

        /// Product catalog CSV
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Read barcodes from stdin (one per line) and report each product
    Scan {
        /// Product catalog CSV
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Write a sample product catalog
    InitCatalog {
        /// Destination (defaults to the configured catalog path)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Prepare a label photo for OCR
    Preprocess { input: PathBuf, output: PathBuf },
    /// Print the effective configuration
    Config {
        /// Also save it to the configuration file
        #[arg(long)]
        write: bool,
    },
}

fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(args.verbose) {
        eprintln!("Failed to initialize logging: {e}");
    }

    if let Err(e) = run(args) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Logs go to stderr so JSON output on stdout stays clean
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let (config, config_path) = load_or_create_config(args.config.as_deref())?;
    let json = args.json || config.output.json;

    // The only clock read in the program
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    info!("Reference day {}", today);

    let app = ExpiryScanApp::new(config, today);

    match args.command {
        Command::Extract {
            texts,
            ocr_json,
            min_confidence,
        } => {
            let report = app.extract(texts, ocr_json.as_deref(), min_confidence)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report);
            }
        }
        Command::Lookup { code, catalog } => {
            let hit = app.lookup(&code, catalog.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&hit)?);
            } else {
                println!("{}", hit);
            }
        }
        Command::Scan { catalog } => {
            info!("Waiting for barcodes on stdin (Ctrl+D to finish)");
            let stdin = std::io::stdin();
            app.scan(stdin.lock(), catalog.as_deref(), |hit| {
                if json {
                    println!("{}", serde_json::to_string(hit)?);
                } else {
                    println!("{}", hit);
                }
                Ok(())
            })?;
        }
        Command::InitCatalog { output, force } => {
            let path = app.init_catalog(output.as_deref(), force)?;
            println!("Sample catalog written to {}", path.display());
        }
        Command::Preprocess { input, output } => {
            app.preprocess(&input, &output)?;
            println!("Preprocessed image written to {}", output.display());
        }
        Command::Config { write } => {
            match &config_path {
                Some(path) => println!("# {}", path.display()),
                None => println!("# built-in defaults"),
            }
            println!("{}", toml::to_string_pretty(app.config())?);

            if write {
                let path = match config_path {
                    Some(path) => path,
                    None => storage::default_config_path()?,
                };
                config::save_config(app.config(), &path)?;
                info!("Saved configuration to {:?}", path);
            }
        }
    }

    Ok(())
}

/// Load configuration from an explicit path, the default location, or
/// fall back to defaults. Returns the file the configuration came from.
fn load_or_create_config(explicit: Option<&Path>) -> Result<(AppConfig, Option<PathBuf>)> {
    if let Some(path) = explicit {
        let config = config::load_config(path)
            .with_context(|| format!("Failed to load configuration {:?}", path))?;
        info!("Loaded configuration from {:?}", path);
        return Ok((config, Some(path.to_path_buf())));
    }

    if let Ok(config_path) = storage::default_config_path() {
        if config_path.exists() {
            match config::load_config(&config_path) {
                Ok(config) => {
                    info!("Loaded configuration from {:?}", config_path);
                    return Ok((config, Some(config_path)));
                }
                Err(e) => warn!("Ignoring unreadable configuration {:?}: {:#}", config_path, e),
            }
        }
    }

    info!("Using default configuration");
    Ok((AppConfig::default(), None))
}
