//! Self-tuning regulation.
//!
//! Gains start from the configured ARC values and only ever grow: every
//! 20 steps a trailing mean performance below target scales the gain and
//! integral-gain vectors up, and a narrative above its threshold raises
//! the narrative integral gain on the spot. Both vectors are bounded.

use arc_types::{ControlAction, Observation, ParamMap, State, clip, clip01};
use nalgebra::Vector3;

use crate::controller::{ArcGains, Controller};
use crate::history::History;

const TUNE_PERIOD: usize = 20;
const PERF_TARGET: f64 = 0.90;
const GAIN_GROWTH: f64 = 1.05;
const INTEGRAL_GROWTH: f64 = 1.10;
const GAIN_RANGE: (f64, f64) = (0.2, 2.0);
const INTEGRAL_RANGE: (f64, f64) = (0.0, 0.5);
const NARRATIVE_MARGIN: f64 = 0.05;
const NARRATIVE_STEP: f64 = 0.01;
const RISK_REFERENCE: f64 = 0.2;

/// Initial integral gains `(narrative, arousal, risk)`.
const INITIAL_KI: [f64; 3] = [0.05, 0.05, 0.02];

/// Self-tuning controller with bounded gain growth.
#[derive(Debug, Clone)]
pub struct ArcAdaptive {
    /// `(k_dmg, k_calm, k_att)`, seeded from the configuration on first use.
    gains: Option<Vector3<f64>>,
    /// `(narrative, arousal, risk)` integral gains.
    ki: Vector3<f64>,
    /// `(narrative, arousal, risk)` integrals.
    integrals: Vector3<f64>,
    perf: History,
    steps: usize,
}

impl ArcAdaptive {
    /// Create a controller with initial integral gains.
    pub fn new() -> Self {
        Self {
            gains: None,
            ki: Vector3::from(INITIAL_KI),
            integrals: Vector3::zeros(),
            perf: History::default(),
            steps: 0,
        }
    }

    /// Current `(k_dmg, k_calm, k_att)`, if any step has run.
    pub const fn gains(&self) -> Option<Vector3<f64>> {
        self.gains
    }

    /// Current `(narrative, arousal, risk)` integral gains.
    pub const fn integral_gains(&self) -> Vector3<f64> {
        self.ki
    }
}

impl Default for ArcAdaptive {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for ArcAdaptive {
    fn name(&self) -> &'static str {
        "arc_adaptive"
    }

    fn act(&mut self, state: &State, obs: &Observation, params: &ParamMap) -> ControlAction {
        let g = ArcGains::from_params(params);
        let mut k = self.gains.unwrap_or_else(|| {
            Vector3::new(g.k_dmg, g.k_calm, g.k_att).map(|x| clip(x, GAIN_RANGE.0, GAIN_RANGE.1))
        });
        let a_ex = g.arousal_excess(state);
        let risk = g.risk(state);

        self.perf.push(obs.perf);
        let errors = Vector3::new(state.s - g.s_safe, state.a - g.a_safe, risk - RISK_REFERENCE);
        self.integrals = (self.integrals + errors).map(|x| clip(x, -1.0, 1.0));

        if state.s - g.s_safe > NARRATIVE_MARGIN {
            self.ki.x = (self.ki.x + NARRATIVE_STEP).min(INTEGRAL_RANGE.1);
        }

        self.steps = self.steps.saturating_add(1);
        if self.steps % TUNE_PERIOD == 0 && self.perf.mean().is_some_and(|m| m < PERF_TARGET) {
            k = (k * GAIN_GROWTH).map(|x| clip(x, GAIN_RANGE.0, GAIN_RANGE.1));
            self.ki = (self.ki * INTEGRAL_GROWTH).map(|x| clip(x, INTEGRAL_RANGE.0, INTEGRAL_RANGE.1));
        }
        self.gains = Some(k);

        let i = self.integrals;
        ControlAction {
            u_dmg: clip01(k.x * risk + self.ki.x * i.x + self.ki.z * i.z),
            u_att: clip01(k.z * state.u * (1.0 - a_ex)),
            u_mem: g.memory_gate(risk, 1.0),
            u_calm: clip01(k.y * a_ex + self.ki.y * i.y),
            u_reapp: g.reappraisal(state, risk, 1.0),
        }
        .clamped()
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
