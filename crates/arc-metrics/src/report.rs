//! The per-run metrics record.

use std::collections::BTreeMap;

use arc_types::Trace;
use serde::{Deserialize, Serialize};

use crate::error::MetricsError;
use crate::measures;
use crate::params::MetricsParams;

/// Metrics of one (scenario, controller, seed) run.
///
/// Serialized names are the report format and match [`RunMetrics::NAMES`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Recovery time in steps.
    #[serde(rename = "RT")]
    pub rt: f64,
    /// Recovery time over `rt_max`, capped at `1`.
    #[serde(rename = "RT_norm")]
    pub rt_norm: f64,
    /// Peak arousal above `a_safe`.
    #[serde(rename = "Overshoot")]
    pub overshoot: f64,
    /// Rumination index.
    #[serde(rename = "RI")]
    pub ri: f64,
    /// Narrative dominance ratio.
    #[serde(rename = "NDR")]
    pub ndr: f64,
    /// Mean control effort per step.
    #[serde(rename = "ControlEffort")]
    pub control_effort: f64,
    /// Mean performance.
    #[serde(rename = "PerfMean")]
    pub perf_mean: f64,
    /// Population standard deviation of performance.
    #[serde(rename = "PerfStd")]
    pub perf_std: f64,
    /// Population standard deviation of post-onset performance.
    #[serde(rename = "StabilityPost")]
    pub stability_post: f64,
    /// Phase-3 over phase-1 performance.
    #[serde(rename = "Retention")]
    pub retention: f64,
    /// Steps to reach 80% of the phase-2 peak.
    #[serde(rename = "AdaptSpeed")]
    pub adapt_speed: f64,
    /// Fast-memory stability.
    #[serde(rename = "MemStability")]
    pub mem_stability: f64,
}

impl RunMetrics {
    /// Metric names in report order.
    pub const NAMES: [&'static str; 12] = [
        "RT",
        "RT_norm",
        "Overshoot",
        "RI",
        "NDR",
        "ControlEffort",
        "PerfMean",
        "PerfStd",
        "StabilityPost",
        "Retention",
        "AdaptSpeed",
        "MemStability",
    ];

    /// The metrics as a `name -> value` mapping.
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        let values = [
            self.rt,
            self.rt_norm,
            self.overshoot,
            self.ri,
            self.ndr,
            self.control_effort,
            self.perf_mean,
            self.perf_std,
            self.stability_post,
            self.retention,
            self.adapt_speed,
            self.mem_stability,
        ];
        Self::NAMES.into_iter().zip(values).collect()
    }
}

/// Score a completed run.
///
/// # Errors
///
/// Returns [`MetricsError::EmptyTrace`] for a trace with no steps and
/// [`MetricsError::Trace`] when its columns disagree in length.
#[allow(clippy::cast_precision_loss)]
pub fn compute_metrics(
    trace: &Trace,
    onset: usize,
    params: &MetricsParams,
) -> Result<RunMetrics, MetricsError> {
    let len = trace.validate()?;
    if len == 0 {
        return Err(MetricsError::EmptyTrace);
    }

    let rt = measures::recovery_time(&trace.perf, &trace.a, onset, params);
    Ok(RunMetrics {
        rt: rt as f64,
        rt_norm: measures::rt_normalized(rt, params.rt_max),
        overshoot: measures::overshoot(&trace.a, params.a_safe),
        ri: measures::rumination_index(&trace.s, params.s_rum_tau, params.ri_persistence_weight),
        ndr: measures::narrative_dominance_ratio(&trace.s, &trace.perf, onset, params.s_safe),
        control_effort: measures::control_effort(&trace.control),
        perf_mean: measures::mean(&trace.perf),
        perf_std: measures::std_dev(&trace.perf),
        stability_post: measures::stability_post(&trace.perf, onset),
        retention: measures::retention(&trace.perf),
        adapt_speed: measures::adaptation_speed(&trace.perf),
        mem_stability: measures::memory_stability(&trace.mf),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use arc_types::{ControlAction, Disturbance, State, TraceRow};

    use super::*;
    use crate::params::tests::test_params;

    fn flat_trace(len: usize, perf: f64) -> Trace {
        let mut trace = Trace::with_capacity(len);
        for t in 0..len {
            trace.push(&TraceRow {
                t,
                disturbance: Disturbance::bounded(0.1, 0.2, 0.2),
                state: State {
                    phi: 0.85,
                    g: 0.85,
                    p: 0.85,
                    i: 0.85,
                    s: 0.3,
                    v: 0.5,
                    a: 0.3,
                    mf: 0.2,
                    ms: 0.2,
                    u: 0.2,
                },
                ccog: 0.5,
                cap: 0.5,
                perf,
                control: ControlAction::NEUTRAL,
            });
        }
        trace
    }

    #[test]
    fn empty_trace_is_fatal() {
        let err = compute_metrics(&Trace::default(), 0, &test_params()).unwrap_err();
        assert!(matches!(err, MetricsError::EmptyTrace));
    }

    #[test]
    fn ragged_trace_is_fatal() {
        let mut trace = flat_trace(10, 0.8);
        trace.s.pop();
        let err = compute_metrics(&trace, 5, &test_params()).unwrap_err();
        assert!(matches!(err, MetricsError::Trace { .. }));
    }

    #[test]
    fn steady_run_recovers_immediately() {
        let m = compute_metrics(&flat_trace(160, 0.8), 50, &test_params()).unwrap();
        assert!(m.rt.abs() < f64::EPSILON);
        assert!(m.ri.abs() < f64::EPSILON);
        assert!(m.control_effort.abs() < f64::EPSILON);
        assert!((m.perf_mean - 0.8).abs() < 1e-12);
        assert!((m.retention - 1.0).abs() < 1e-12);
        assert!((m.mem_stability - 1.0).abs() < 1e-12);
    }

    #[test]
    fn collapsed_run_reports_rt_max() {
        let m = compute_metrics(&flat_trace(160, 0.1), 50, &test_params()).unwrap();
        assert!((m.rt - 100.0).abs() < f64::EPSILON);
        assert!((m.rt_norm - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn serialized_names_match_report_order() {
        let m = compute_metrics(&flat_trace(20, 0.8), 5, &test_params()).unwrap();
        let json = serde_json::to_value(m).unwrap();
        for name in RunMetrics::NAMES {
            assert!(json.get(name).is_some(), "missing {name}");
        }
        let map = m.to_map();
        assert_eq!(map.len(), 12);
        assert!((map.get("PerfMean").unwrap() - m.perf_mean).abs() < f64::EPSILON);
    }
}
