//! Experiment matrices, summaries, and the threshold sensitivity sweep.
//!
//! An experiment runs every listed controller on every listed scenario for
//! every seed. Each (scenario, controller) pair is a batch that reuses one
//! controller instance; [`run_episode`] resets it between seeds.

use arc_control::ControllerKind;
use arc_metrics::RunMetrics;
use arc_scenarios::Scenario;
use arc_types::{ParamMap, Trace};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ExperimentConfig;
use crate::runner::{RunnerError, run_episode};

/// Identifies an experiment in its output stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentHeader {
    /// Experiment identifier from the config.
    pub experiment_id: String,
    /// Experiment name from the config.
    pub name: String,
    /// Wall-clock start of the experiment.
    pub started_at: DateTime<Utc>,
    /// Scenarios in run order.
    pub scenarios: Vec<String>,
    /// Controllers in run order.
    pub controllers: Vec<ControllerKind>,
    /// Seeds run per pair.
    pub seeds: Vec<u64>,
}

impl ExperimentHeader {
    /// Header for running `controllers` on `scenarios` under `config`.
    pub fn new(
        config: &ExperimentConfig,
        scenarios: &[Scenario],
        controllers: &[ControllerKind],
    ) -> Self {
        Self {
            experiment_id: config.experiment_id.clone(),
            name: config.name.clone(),
            started_at: Utc::now(),
            scenarios: scenarios.iter().map(|s| s.name().to_owned()).collect(),
            controllers: controllers.to_vec(),
            seeds: config.seeds.clone(),
        }
    }
}

/// Metrics of one run, tagged with what produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRow {
    /// Scenario name.
    pub scenario: String,
    /// Controller.
    pub controller: ControllerKind,
    /// Generator seed.
    pub seed: u64,
    /// The run's scores.
    #[serde(flatten)]
    pub metrics: RunMetrics,
}

/// One finished run of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRun {
    /// The tagged scores.
    pub row: MetricsRow,
    /// The full trace.
    pub trace: Trace,
}

/// Per-(scenario, controller) means over seeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Scenario name.
    pub scenario: String,
    /// Controller.
    pub controller: ControllerKind,
    /// Number of runs averaged.
    pub runs: usize,
    /// Mean performance.
    #[serde(rename = "PerfMean")]
    pub perf_mean: f64,
    /// Mean recovery time.
    #[serde(rename = "RT")]
    pub rt: f64,
    /// Mean rumination index.
    #[serde(rename = "RI")]
    pub ri: f64,
    /// Mean narrative dominance ratio.
    #[serde(rename = "NDR")]
    pub ndr: f64,
    /// Mean control effort.
    #[serde(rename = "ControlEffort")]
    pub control_effort: f64,
}

/// One grid point of the threshold sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    /// Arousal threshold used.
    pub a_safe: f64,
    /// Narrative threshold used.
    pub s_safe: f64,
    /// Number of runs averaged.
    pub runs: usize,
    /// Mean performance.
    #[serde(rename = "PerfMean")]
    pub perf_mean: f64,
    /// Mean rumination index.
    #[serde(rename = "RI")]
    pub ri: f64,
}

/// Run one controller on one scenario for each seed.
///
/// # Errors
///
/// Returns the first [`RunnerError`] any run reports.
pub fn run_batch(
    scenario: &Scenario,
    kind: ControllerKind,
    seeds: &[u64],
    params: &ParamMap,
) -> Result<Vec<BatchRun>, RunnerError> {
    let mut controller = kind.build();
    seeds
        .iter()
        .map(|&seed| {
            let outcome = run_episode(controller.as_mut(), scenario, seed, params)?;
            Ok(BatchRun {
                row: MetricsRow {
                    scenario: scenario.name().to_owned(),
                    controller: kind,
                    seed,
                    metrics: outcome.metrics,
                },
                trace: outcome.trace,
            })
        })
        .collect()
}

/// Run `controllers` on every scenario of `config` for every seed.
///
/// Rows come back in scenario, controller, seed order.
///
/// # Errors
///
/// Returns [`RunnerError::Scenario`] if the scenario selection cannot be
/// built, or the first error any run reports.
pub fn run_matrix(
    config: &ExperimentConfig,
    controllers: &[ControllerKind],
) -> Result<Vec<MetricsRow>, RunnerError> {
    let scenarios = config.build_scenarios()?;
    let mut rows = Vec::new();
    for scenario in &scenarios {
        for &kind in controllers {
            let batch = run_batch(scenario, kind, &config.seeds, &config.params)?;
            rows.extend(batch.into_iter().map(|run| run.row));
        }
        info!(
            scenario = scenario.name(),
            controllers = controllers.len(),
            seeds = config.seeds.len(),
            "scenario complete"
        );
    }
    Ok(rows)
}

/// Average rows per (scenario, controller), in first-seen order.
pub fn summarize(rows: &[MetricsRow]) -> Vec<SummaryRow> {
    let mut groups: Vec<(&str, ControllerKind, Vec<&RunMetrics>)> = Vec::new();
    for row in rows {
        let existing = groups.iter_mut().find(|(scenario, controller, _)| {
            *scenario == row.scenario && *controller == row.controller
        });
        match existing {
            Some((_, _, runs)) => runs.push(&row.metrics),
            None => groups.push((row.scenario.as_str(), row.controller, vec![&row.metrics])),
        }
    }

    groups
        .into_iter()
        .map(|(scenario, controller, runs)| SummaryRow {
            scenario: scenario.to_owned(),
            controller,
            runs: runs.len(),
            perf_mean: mean_of(&runs, |m| m.perf_mean),
            rt: mean_of(&runs, |m| m.rt),
            ri: mean_of(&runs, |m| m.ri),
            ndr: mean_of(&runs, |m| m.ndr),
            control_effort: mean_of(&runs, |m| m.control_effort),
        })
        .collect()
}

/// Sweep `(a_safe, s_safe)` over the configured grid.
///
/// Each grid point overrides both thresholds in the parameter set and runs
/// the sweep controller on the sweep scenario for the first `sweep.seeds`
/// seeds of the experiment.
///
/// # Errors
///
/// Returns [`RunnerError::Scenario`] for an unknown sweep scenario, or the
/// first error any run reports.
pub fn threshold_sweep(config: &ExperimentConfig) -> Result<Vec<SweepRow>, RunnerError> {
    let sweep = &config.sweep;
    let seeds: Vec<u64> = config.seeds.iter().copied().take(sweep.seeds).collect();
    let mut rows = Vec::with_capacity(sweep.a_safe.len().saturating_mul(sweep.s_safe.len()));

    for &a_safe in &sweep.a_safe {
        for &s_safe in &sweep.s_safe {
            let params = config
                .params
                .clone()
                .with("a_safe", a_safe)
                .with("s_safe", s_safe);
            let scenario = arc_scenarios::find(&sweep.scenario, &params)?;
            let batch = run_batch(&scenario, sweep.controller, &seeds, &params)?;
            let runs: Vec<&RunMetrics> = batch.iter().map(|run| &run.row.metrics).collect();
            let row = SweepRow {
                a_safe,
                s_safe,
                runs: runs.len(),
                perf_mean: mean_of(&runs, |m| m.perf_mean),
                ri: mean_of(&runs, |m| m.ri),
            };
            info!(a_safe, s_safe, perf_mean = row.perf_mean, ri = row.ri, "sweep point");
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Mean of one metric over runs; `0` for no runs.
#[allow(clippy::cast_precision_loss)]
fn mean_of(runs: &[&RunMetrics], metric: impl Fn(&RunMetrics) -> f64) -> f64 {
    if runs.is_empty() {
        return 0.0;
    }
    runs.iter().map(|&m| metric(m)).sum::<f64>() / runs.len() as f64
}
