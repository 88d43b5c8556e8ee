//! Error types for the experiment runner binary.

use arc_core::{ConfigError, RunnerError};
use arc_scenarios::ScenarioError;

/// Errors that can occur while running an experiment from the command line.
#[derive(Debug, thiserror::Error)]
pub enum LabError {
    /// The configuration file could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The scenario selection could not be built.
    #[error("scenario error: {0}")]
    Scenario(#[from] ScenarioError),

    /// A run failed.
    #[error("run error: {0}")]
    Run(#[from] RunnerError),

    /// A batch task panicked or was cancelled.
    #[error("batch task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// A record could not be serialized.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Writing to stdout failed.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}
