//! Configuration, run orchestration, and experiments for the ARC
//! regulation simulation.
//!
//! This crate wires the plant, the scenario catalog, the controllers, and
//! the metrics engine into closed-loop runs.
//!
//! # Modules
//!
//! - [`config`] -- Loading `arc-config.yaml` into an [`ExperimentConfig`],
//!   with the built-in [`default_params`] merged underneath.
//! - [`runner`] -- [`run_episode`], one seeded (scenario, controller) run.
//! - [`experiment`] -- Run matrices, per-pair summaries, and the threshold
//!   sweep.

pub mod config;
pub mod experiment;
pub mod runner;

pub use config::{ConfigError, ExperimentConfig, SweepConfig, default_params};
pub use experiment::{
    BatchRun, ExperimentHeader, MetricsRow, SummaryRow, SweepRow, run_batch, run_matrix,
    summarize, threshold_sweep,
};
pub use runner::{RunOutcome, RunnerError, run_episode, run_named};
