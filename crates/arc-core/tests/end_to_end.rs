//! End-to-end closed-loop runs through the public API.

#![allow(clippy::unwrap_used)]

use arc_control::ControllerKind;
use arc_core::{ExperimentConfig, default_params, run_episode, run_matrix, summarize};
use arc_scenarios::{Scenario, ScenarioKind, ScenarioParams};

fn reward_flip() -> (Scenario, arc_types::ParamMap) {
    let params = default_params().with("horizon", 150.0).with("shock_t", 50.0);
    let scenario = Scenario::new(
        ScenarioKind::RewardFlip,
        &ScenarioParams::from_map(&params).unwrap(),
    );
    (scenario, params)
}

#[test]
fn reward_flip_trace_has_one_row_per_step() {
    let (scenario, params) = reward_flip();
    assert_eq!(scenario.onset, 50);

    let mut controller = ControllerKind::ArcV1.build();
    let out = run_episode(controller.as_mut(), &scenario, 1, &params).unwrap();
    assert_eq!(out.trace.len(), 150);
    assert_eq!(out.trace.t, (0..150).collect::<Vec<_>>());
    assert_eq!(out.trace.validate().unwrap(), 150);
}

#[test]
fn no_control_reward_flip_runs_the_full_horizon() {
    let (scenario, params) = reward_flip();
    assert_eq!(scenario.onset, 50);

    let mut controller = ControllerKind::NoControl.build();
    let out = run_episode(controller.as_mut(), &scenario, 1, &params).unwrap();
    assert_eq!(out.trace.len(), 150);
    assert_eq!(out.trace.t, (0..150).collect::<Vec<_>>());
    assert!(out.metrics.control_effort.abs() < f64::EPSILON);
}

#[test]
fn regulation_beats_no_control_on_reward_flip() {
    let (scenario, params) = reward_flip();

    let mut none = ControllerKind::NoControl.build();
    let mut arc = ControllerKind::ArcV1.build();
    let baseline = run_episode(none.as_mut(), &scenario, 1, &params).unwrap();
    let regulated = run_episode(arc.as_mut(), &scenario, 1, &params).unwrap();

    assert!(
        baseline.metrics.perf_mean < regulated.metrics.perf_mean,
        "no_control {} vs arc_v1 {}",
        baseline.metrics.perf_mean,
        regulated.metrics.perf_mean
    );
    assert!(baseline.metrics.control_effort.abs() < f64::EPSILON);
    assert!(regulated.metrics.control_effort > 0.0);
}

#[test]
fn every_controller_runs_every_scenario() {
    let config = ExperimentConfig::parse("seeds: [11]\nhorizon: 120\n").unwrap();
    let rows = run_matrix(&config, &ControllerKind::ALL).unwrap();
    assert_eq!(rows.len(), 10 * 19);

    for row in &rows {
        let m = &row.metrics;
        assert!((0.0..=1.0).contains(&m.perf_mean), "{row:?}");
        assert!((0.0..=1.0).contains(&m.rt_norm), "{row:?}");
        assert!(m.ri >= 0.0 && m.ndr >= 0.0, "{row:?}");
    }
    assert_eq!(summarize(&rows).len(), 10 * 19);
}

#[test]
fn removing_suppression_changes_the_run() {
    let config = ExperimentConfig::parse("seeds: [4]\nscenarios: [sudden_threat]\n").unwrap();
    let rows = run_matrix(&config, &ControllerKind::ABLATION).unwrap();
    assert_eq!(rows.len(), 5);

    // Same seed and an open-loop scenario: only the regulation differs.
    let full = rows.first().unwrap();
    assert_eq!(full.controller, ControllerKind::ArcV1);
    let no_dmg = rows
        .iter()
        .find(|r| r.controller == ControllerKind::ArcNoDmg)
        .unwrap();
    assert!(no_dmg.metrics.control_effort < full.metrics.control_effort);
}
