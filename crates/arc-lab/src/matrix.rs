//! Parallel execution of experiment batches.
//!
//! Each (scenario, controller) batch runs on tokio's blocking pool with its
//! own controller instance. The config is shared read-only; results are
//! collected in submission order, so output does not depend on scheduling.

use std::sync::Arc;

use arc_control::ControllerKind;
use arc_core::{BatchRun, ExperimentConfig, RunnerError, run_batch};
use arc_scenarios::Scenario;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::LabError;

/// Run every controller on every scenario for every configured seed.
pub async fn run_parallel(
    config: Arc<ExperimentConfig>,
    scenarios: Vec<Scenario>,
    controllers: &[ControllerKind],
) -> Result<Vec<BatchRun>, LabError> {
    let mut handles: Vec<JoinHandle<Result<Vec<BatchRun>, RunnerError>>> =
        Vec::with_capacity(scenarios.len().saturating_mul(controllers.len()));

    for scenario in scenarios {
        for &kind in controllers {
            let config = Arc::clone(&config);
            let scenario = scenario.clone();
            handles.push(tokio::task::spawn_blocking(move || {
                debug!(scenario = scenario.name(), controller = kind.name(), "batch started");
                run_batch(&scenario, kind, &config.seeds, &config.params)
            }));
        }
    }

    let batches = handles.len();
    let mut runs = Vec::new();
    for handle in handles {
        runs.extend(handle.await??);
    }
    info!(batches, runs = runs.len(), "matrix complete");
    Ok(runs)
}
