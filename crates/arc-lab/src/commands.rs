//! Subcommand handlers.

use std::io::Write;
use std::sync::Arc;

use arc_control::ControllerKind;
use arc_core::{ExperimentConfig, ExperimentHeader, MetricsRow, summarize, threshold_sweep};
use tracing::info;

use crate::error::LabError;
use crate::matrix::run_parallel;
use crate::output::{ControllerEntry, JsonLines, ScenarioEntry, TraceRecord};

/// Run `controllers` over the configured scenarios and seeds.
///
/// Emits the experiment header, one `metrics` record per run (followed by
/// its `trace` record when `traces` is set), then one `summary` record per
/// (scenario, controller) pair.
pub async fn matrix<W: Write>(
    config: &Arc<ExperimentConfig>,
    controllers: &[ControllerKind],
    traces: bool,
    out: &mut JsonLines<W>,
) -> Result<(), LabError> {
    let scenarios = config.build_scenarios()?;
    out.emit(
        "experiment",
        &ExperimentHeader::new(config, &scenarios, controllers),
    )?;
    info!(
        scenarios = scenarios.len(),
        controllers = controllers.len(),
        seeds = config.seeds.len(),
        "running matrix"
    );

    let runs = run_parallel(Arc::clone(config), scenarios, controllers).await?;
    for run in &runs {
        out.emit("metrics", &run.row)?;
        if traces {
            out.emit(
                "trace",
                &TraceRecord {
                    scenario: &run.row.scenario,
                    controller: run.row.controller,
                    seed: run.row.seed,
                    trace: &run.trace,
                },
            )?;
        }
    }

    let rows: Vec<MetricsRow> = runs.into_iter().map(|run| run.row).collect();
    for summary in summarize(&rows) {
        out.emit("summary", &summary)?;
    }
    Ok(())
}

/// Run the threshold sweep on the blocking pool and emit one record per
/// grid point.
pub async fn sweep<W: Write>(
    config: &Arc<ExperimentConfig>,
    out: &mut JsonLines<W>,
) -> Result<(), LabError> {
    info!(
        a_safe = config.sweep.a_safe.len(),
        s_safe = config.sweep.s_safe.len(),
        scenario = config.sweep.scenario,
        controller = config.sweep.controller.name(),
        "running threshold sweep"
    );
    let shared = Arc::clone(config);
    let rows = tokio::task::spawn_blocking(move || threshold_sweep(&shared)).await??;
    for row in &rows {
        out.emit("sweep", row)?;
    }
    Ok(())
}

/// Emit the scenario catalog and the controller registry.
pub fn list<W: Write>(config: &ExperimentConfig, out: &mut JsonLines<W>) -> Result<(), LabError> {
    for scenario in config.build_scenarios()? {
        out.emit(
            "scenario",
            &ScenarioEntry {
                name: scenario.name(),
                onset: scenario.onset,
                horizon: scenario.horizon,
                state_coupled: scenario.kind.is_state_coupled(),
            },
        )?;
    }
    for kind in ControllerKind::ALL {
        out.emit(
            "controller",
            &ControllerEntry {
                name: kind,
                ablation: ControllerKind::ABLATION.contains(&kind),
                comparison: ControllerKind::COMPARISON.contains(&kind),
            },
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn records(buf: &[u8]) -> Vec<serde_json::Value> {
        std::str::from_utf8(buf)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn count(records: &[serde_json::Value], kind: &str) -> usize {
        records.iter().filter(|r| r["record"] == kind).count()
    }

    #[tokio::test]
    async fn matrix_emits_header_rows_traces_and_summaries() {
        let config = Arc::new(
            ExperimentConfig::parse("seeds: [1, 2]\nhorizon: 60\nscenarios: [reward_flip]\n")
                .unwrap(),
        );
        let mut buf = Vec::new();
        let mut out = JsonLines::new(&mut buf);
        matrix(&config, &ControllerKind::ABLATION, true, &mut out)
            .await
            .unwrap();
        out.finish().unwrap();

        let records = records(&buf);
        assert_eq!(records.first().unwrap()["record"], "experiment");
        assert_eq!(count(&records, "metrics"), 10);
        assert_eq!(count(&records, "trace"), 10);
        assert_eq!(count(&records, "summary"), 5);

        let trace = records.iter().find(|r| r["record"] == "trace").unwrap();
        assert_eq!(trace["trace"]["perf"].as_array().unwrap().len(), 60);
    }

    #[tokio::test]
    async fn sweep_emits_one_record_per_grid_point() {
        let config = Arc::new(
            ExperimentConfig::parse(
                "seeds: [1]\nhorizon: 60\nsweep:\n  a_safe: [0.5, 0.6]\n  s_safe: [0.5, 0.6, 0.7]\n",
            )
            .unwrap(),
        );
        let mut buf = Vec::new();
        let mut out = JsonLines::new(&mut buf);
        sweep(&config, &mut out).await.unwrap();
        assert_eq!(out.finish().unwrap(), 6);
        assert_eq!(count(&records(&buf), "sweep"), 6);
    }

    #[test]
    fn list_covers_catalog_and_registry() {
        let config = ExperimentConfig::default();
        let mut buf = Vec::new();
        let mut out = JsonLines::new(&mut buf);
        list(&config, &mut out).unwrap();
        out.finish().unwrap();

        let records = records(&buf);
        assert_eq!(count(&records, "scenario"), 10);
        assert_eq!(count(&records, "controller"), 19);
    }
}
