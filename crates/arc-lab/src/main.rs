//! Command-line experiment runner for the ARC regulation simulation.
//!
//! Loads an experiment from `arc-config.yaml` (or the file named by
//! `--config` / `ARC_CONFIG`), runs it, and writes JSON-lines records to
//! stdout. Logs go to stderr.
//!
//! # Commands
//!
//! - `run`: the controller comparison matrix, with per-pair summaries.
//! - `ablation`: ARC v1 and its single-channel ablations.
//! - `sweep`: the `(a_safe, s_safe)` threshold sensitivity grid.
//! - `list`: the scenario catalog and the controller registry.
//!
//! # Architecture
//!
//! ```text
//! YAML config --> (scenario, controller) batches --> blocking pool --> JSON lines
//! ```
//!
//! Every batch owns a fresh controller and shares the config read-only.

mod commands;
mod error;
mod matrix;
mod output;

use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;

use arc_control::ControllerKind;
use arc_core::ExperimentConfig;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::output::JsonLines;

/// ARC closed-loop regulation experiments.
#[derive(Parser)]
#[command(name = "arc-lab")]
#[command(version)]
#[command(about = "Run ARC regulation experiments and emit JSON-lines results")]
struct Cli {
    /// Experiment configuration file.
    #[arg(long, env = "ARC_CONFIG", default_value = "arc-config.yaml", global = true)]
    config: PathBuf,

    /// Also emit the full per-step trace of every run.
    #[arg(long, global = true)]
    traces: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the controller comparison matrix.
    Run {
        /// Comma-separated controllers overriding the config's selection.
        #[arg(long, value_delimiter = ',')]
        controllers: Vec<ControllerKind>,
    },
    /// Run ARC v1 and its single-channel ablations.
    Ablation,
    /// Sweep the arousal and narrative thresholds.
    Sweep,
    /// List scenarios and controllers.
    List,
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, a run fails, or
/// stdout cannot be written.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!(config = %cli.config.display(), "arc-lab starting");

    let config = Arc::new(ExperimentConfig::from_file(&cli.config)?);
    info!(
        experiment_id = config.experiment_id,
        name = config.name,
        seeds = config.seeds.len(),
        params = config.params.len(),
        "configuration loaded"
    );

    let mut out = JsonLines::new(BufWriter::new(std::io::stdout()));
    match cli.command {
        Commands::Run { controllers } => {
            let controllers = if controllers.is_empty() {
                config.controller_set()
            } else {
                controllers
            };
            commands::matrix(&config, &controllers, cli.traces, &mut out).await?;
        }
        Commands::Ablation => {
            commands::matrix(&config, &ControllerKind::ABLATION, cli.traces, &mut out).await?;
        }
        Commands::Sweep => commands::sweep(&config, &mut out).await?,
        Commands::List => commands::list(&config, &mut out)?,
    }

    let records = out.finish()?;
    info!(records, "done");
    Ok(())
}
