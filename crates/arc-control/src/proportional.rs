//! Proportional regulation (ARC v1) and its single-channel ablations.

use arc_types::{ControlAction, Observation, ParamMap, State};
use serde::{Deserialize, Serialize};

use crate::controller::{ArcGains, Controller};

/// Proportional law with every gain multiplied by `scale`.
///
/// Narrative suppression is scaled by `max(scale, 1)`: a scale below one
/// never weakens it.
pub fn proportional_law(state: &State, gains: &ArcGains, scale: f64) -> ControlAction {
    let a_ex = gains.arousal_excess(state);
    let risk = gains.risk(state);
    ControlAction {
        u_dmg: (scale.max(1.0) * gains.k_dmg * risk).min(1.0),
        u_att: gains.attention(state, a_ex, scale),
        u_mem: gains.memory_gate(risk, scale),
        u_calm: (scale * gains.k_calm * a_ex).min(1.0),
        u_reapp: gains.reappraisal(state, risk, scale),
    }
    .clamped()
}

/// A regulation channel removed for an ablation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ablation {
    /// Narrative suppression disabled.
    NoDmg,
    /// Arousal damping disabled.
    NoCalm,
    /// Memory gating disabled.
    NoMem,
    /// Reappraisal disabled.
    NoReapp,
}

impl Ablation {
    /// Force the ablated channel to its neutral value.
    pub const fn apply(self, action: ControlAction) -> ControlAction {
        let mut out = action;
        match self {
            Self::NoDmg => out.u_dmg = 0.0,
            Self::NoCalm => out.u_calm = 0.0,
            Self::NoMem => out.u_mem = 1.0,
            Self::NoReapp => out.u_reapp = 0.0,
        }
        out
    }
}

/// ARC v1: direct proportional maps from risk and state errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArcV1 {
    ablation: Option<Ablation>,
}

impl ArcV1 {
    /// The full proportional controller.
    pub const fn new() -> Self {
        Self { ablation: None }
    }

    /// The proportional controller with one channel disabled.
    pub const fn ablated(ablation: Ablation) -> Self {
        Self {
            ablation: Some(ablation),
        }
    }
}

impl Controller for ArcV1 {
    fn name(&self) -> &'static str {
        match self.ablation {
            None => "arc_v1",
            Some(Ablation::NoDmg) => "arc_no_dmg",
            Some(Ablation::NoCalm) => "arc_no_calm",
            Some(Ablation::NoMem) => "arc_no_mem",
            Some(Ablation::NoReapp) => "arc_no_reapp",
        }
    }

    fn act(&mut self, state: &State, _obs: &Observation, params: &ParamMap) -> ControlAction {
        let action = proportional_law(state, &ArcGains::from_params(params), 1.0);
        self.ablation.map_or(action, |ab| ab.apply(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::tests::{obs, state};

    #[test]
    fn quiet_state_gets_light_touch() {
        let mut c = ArcV1::new();
        let action = c.act(&state(0.3, 0.3, 0.2), &obs(0.8), &ParamMap::new());
        // risk = 0.4 * 0.2
        assert!((action.u_dmg - 0.95 * 0.08).abs() < 1e-12);
        assert!(action.u_calm.abs() < f64::EPSILON);
        assert!((action.u_mem - (1.0 - 0.8 * 0.08)).abs() < 1e-12);
        assert!((action.u_att - 0.75 * 0.2).abs() < 1e-12);
        assert!((action.u_reapp - 0.5 * 0.2 * 0.92).abs() < 1e-12);
    }

    #[test]
    fn distressed_state_is_regulated_within_bounds() {
        let mut c = ArcV1::new();
        let action = c.act(&state(1.0, 1.0, 1.0), &obs(0.1), &ParamMap::new());
        assert!(action.is_bounded());
        assert!(action.u_calm > 0.3);
        assert!(action.u_mem < 0.5);
    }

    #[test]
    fn ablations_zero_one_channel() {
        let s = state(0.9, 0.8, 0.7);
        let full = ArcV1::new().act(&s, &obs(0.5), &ParamMap::new());
        for ab in [Ablation::NoDmg, Ablation::NoCalm, Ablation::NoMem, Ablation::NoReapp] {
            let out = ArcV1::ablated(ab).act(&s, &obs(0.5), &ParamMap::new());
            assert_eq!(out, ab.apply(full));
            assert!((out.u_att - full.u_att).abs() < f64::EPSILON);
        }
        assert!((Ablation::NoMem.apply(full).u_mem - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn scale_below_one_never_weakens_suppression() {
        let g = ArcGains::default();
        let s = state(0.9, 0.9, 0.6);
        let nominal = proportional_law(&s, &g, 1.0);
        let relaxed = proportional_law(&s, &g, 0.5);
        assert!((relaxed.u_dmg - nominal.u_dmg).abs() < f64::EPSILON);
        assert!(relaxed.u_calm < nominal.u_calm);
    }
}
