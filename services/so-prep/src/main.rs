//! Southern Ocean data preparation.
//!
//! Loads and validates the pipeline configuration and reports the catalog it
//! points at. Processing is driven through the library crates.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use catalog::NetcdfCatalog;
use clap::Parser;
use grid_processor::PipelineConfig;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "so-prep")]
#[command(about = "Southern Ocean ocean/sea-ice data preparation")]
struct Args {
    /// Configuration file (YAML). Without it, configuration comes from SO_* variables.
    #[arg(short, long, env = "SO_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    if args.json {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .init();
    } else {
        fmt().with_env_filter(filter).with_target(true).init();
    }

    info!("Starting Southern Ocean data preparation");

    let config = load_config(args.config.as_ref())?;
    config
        .validate()
        .map_err(|e| anyhow!("invalid configuration: {}", e))?;

    info!(
        config = %serde_json::to_string(&config)?,
        "Loaded configuration"
    );

    match &config.catalog_root {
        Some(root) => {
            let catalog = NetcdfCatalog::open(root)
                .with_context(|| format!("opening catalog at {}", root.display()))?;
            let experiments: Vec<&str> = catalog.experiments().collect();
            if !experiments.contains(&config.reconciler.experiment.as_str()) {
                warn!(
                    experiment = %config.reconciler.experiment,
                    "Configured experiment not found in catalog"
                );
            }
            info!(root = %root.display(), experiments = ?experiments, "Catalog ready");
        }
        None => info!("No catalog root configured"),
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<PipelineConfig> {
    match path {
        Some(path) => {
            let mut config = PipelineConfig::from_yaml_file(path)
                .with_context(|| format!("reading {}", path.display()))?;
            config.apply_env();
            Ok(config)
        }
        None => Ok(PipelineConfig::from_env()),
    }
}
