//! Conservative regulation with a disturbance-size safety margin.

use arc_types::{ControlAction, Observation, ParamMap, State, clip, clip01};
use nalgebra::Vector3;

use crate::controller::{ArcGains, Controller};

const K_DMG: f64 = 1.2;
const K_CALM: f64 = 1.1;
const K_ATT: f64 = 0.6;
const KI_NARRATIVE: f64 = 0.10;
const SMOOTHING: f64 = 0.9;
const MARGIN: f64 = 0.5;

/// Fixed conservative gains plus a margin sized by recent disturbances.
///
/// The disturbance estimate is an exponential average of the norm of the
/// excess vector `(a_excess, s_excess, u)`. Half of it is added to
/// suppression and calming. A clamped narrative integral adds persistent
/// suppression while the narrative stays above its threshold.
#[derive(Debug, Clone, Default)]
pub struct ArcRobust {
    disturbance: f64,
    narrative_integral: f64,
}

impl ArcRobust {
    /// Create a robust controller with zero disturbance estimate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current smoothed disturbance magnitude.
    pub const fn disturbance(&self) -> f64 {
        self.disturbance
    }
}

impl Controller for ArcRobust {
    fn name(&self) -> &'static str {
        "arc_robust"
    }

    fn act(&mut self, state: &State, _obs: &Observation, params: &ParamMap) -> ControlAction {
        let g = ArcGains::from_params(params);
        let a_ex = g.arousal_excess(state);
        let s_ex = g.narrative_excess(state);
        let risk = g.risk(state);

        let excess = Vector3::new(a_ex, s_ex, state.u);
        self.disturbance = SMOOTHING * self.disturbance + (1.0 - SMOOTHING) * excess.norm();
        self.narrative_integral = clip(self.narrative_integral + (state.s - g.s_safe), -1.0, 1.0);
        let margin = MARGIN * self.disturbance;

        ControlAction {
            u_dmg: clip01(K_DMG * risk + KI_NARRATIVE * self.narrative_integral + margin),
            u_att: clip01(K_ATT * state.u * (1.0 - a_ex)),
            u_mem: g.memory_gate(risk, 1.0),
            u_calm: clip01(K_CALM * a_ex + margin),
            u_reapp: g.reappraisal(state, risk, 1.0),
        }
        .clamped()
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
