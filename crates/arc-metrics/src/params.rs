//! Typed view of the metric keys.

use arc_types::{ParamError, ParamMap};

/// Thresholds and windows used to score a run.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsParams {
    /// Pre-onset window length for the recovery baseline.
    pub baseline_window: usize,
    /// Half-width of the performance recovery band.
    pub rt_eps: f64,
    /// Arousal tolerance above `a_safe` for recovery.
    pub rt_a_eps: f64,
    /// Recovery time reported when the run never recovers.
    pub rt_max: usize,
    /// Arousal safety threshold.
    pub a_safe: f64,
    /// Narrative safety threshold.
    pub s_safe: f64,
    /// Rumination threshold.
    pub s_rum_tau: f64,
    /// Weight of run persistence in the rumination index.
    pub ri_persistence_weight: f64,
}

impl MetricsParams {
    /// Build the typed view, failing on the first missing key.
    pub fn from_map(params: &ParamMap) -> Result<Self, ParamError> {
        let rt_max = params.require_count("rt_max")?;
        if rt_max == 0 {
            return Err(ParamError::Invalid {
                key: String::from("rt_max"),
                value: 0.0,
                reason: "recovery cap must be positive",
            });
        }
        Ok(Self {
            baseline_window: params.require_count("baseline_window")?,
            rt_eps: params.require("rt_eps")?,
            rt_a_eps: params.require("rt_a_eps")?,
            rt_max,
            a_safe: params.require("a_safe")?,
            s_safe: params.require("s_safe")?,
            s_rum_tau: params.require("s_rum_tau")?,
            ri_persistence_weight: params.require("ri_persistence_weight")?,
        })
    }
}
