//! Linear-quadratic regulation with a fixed gain, plus the integral variant.
//!
//! The gain was obtained offline from a discrete algebraic Riccati solution
//! of the linearized plant and is embedded as a constant. Rows map to
//! `(u_dmg, u_calm, u_att)`; columns to the error vector
//! `(a - a_set, s - s_set, u)`.

use arc_types::{ControlAction, Observation, ParamMap, State, clip, clip01};
use nalgebra::{Matrix3, Vector3};

use crate::controller::{ArcGains, Controller};
use crate::meta::{META_PERIOD, MetaGain, rumination_proxy};

/// Narrative integral gain of the LQI law.
pub const LQI_KI_S: f64 = 0.15;

/// Arousal integral gain of the LQI law.
pub const LQI_KI_A: f64 = 0.10;

/// Anti-windup bound of both LQI integrals.
const LQI_LIMIT: f64 = 1.0;

/// The embedded state-feedback gain.
pub fn lqr_gain() -> Matrix3<f64> {
    Matrix3::new(
        0.10, 1.80, 0.40, //
        1.50, 0.20, 0.10, //
        -0.30, 0.00, 0.80,
    )
}

/// Error vector `(a - a_set, s - s_set, u)`.
pub fn error_vector(state: &State, a_set: f64, s_set: f64) -> Vector3<f64> {
    Vector3::new(state.a - a_set, state.s - s_set, state.u)
}

/// Raw LQR output `(u_dmg, u_calm, u_att)` before clamping.
pub fn lqr_output(state: &State, a_set: f64, s_set: f64) -> Vector3<f64> {
    lqr_gain() * error_vector(state, a_set, s_set)
}

/// Narrative and arousal integrators of the LQI law.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LqiIntegrals {
    narrative: f64,
    arousal: f64,
}

impl LqiIntegrals {
    /// Accumulate one step and return the LQI output `(u_dmg, u_calm, u_att)`
    /// with every component in `[0, 1]`.
    ///
    /// The narrative integral runs against `s_tau`, a rumination threshold
    /// stricter than the narrative setpoint; the arousal integral runs
    /// against `a_set`.
    pub fn output(&mut self, state: &State, a_set: f64, s_set: f64, s_tau: f64) -> Vector3<f64> {
        self.narrative = clip(self.narrative + (state.s - s_tau), -LQI_LIMIT, LQI_LIMIT);
        self.arousal = clip(self.arousal + (state.a - a_set), -LQI_LIMIT, LQI_LIMIT);
        let base = lqr_output(state, a_set, s_set);
        Vector3::new(
            clip01(base.x + LQI_KI_S * self.narrative),
            clip01(base.y + LQI_KI_A * self.arousal),
            clip01(base.z),
        )
    }

    /// Current `(narrative, arousal)` integrals.
    pub const fn values(&self) -> (f64, f64) {
        (self.narrative, self.arousal)
    }

    /// Zero both integrals.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Assemble an action from `(u_dmg, u_calm, u_att)` and risk-driven
/// memory gating and reappraisal.
pub fn compose(
    v: &Vector3<f64>,
    state: &State,
    gains: &ArcGains,
    risk: f64,
    scale: f64,
) -> ControlAction {
    ControlAction {
        u_dmg: v.x,
        u_att: v.z,
        u_mem: gains.memory_gate(risk, scale),
        u_calm: v.y,
        u_reapp: gains.reappraisal(state, risk, scale),
    }
    .clamped()
}

/// LQR controller, optionally with rows scaled by a meta loop.
#[derive(Debug, Clone, Default)]
pub struct ArcLqr {
    meta: Option<MetaGain>,
}

impl ArcLqr {
    /// Fixed-gain LQR.
    pub const fn new() -> Self {
        Self { meta: None }
    }

    /// LQR whose rows follow a 20-step meta loop.
    pub fn with_meta() -> Self {
        Self {
            meta: Some(MetaGain::new(META_PERIOD)),
        }
    }
}

impl Controller for ArcLqr {
    fn name(&self) -> &'static str {
        if self.meta.is_some() {
            "arc_v3_lqr_meta"
        } else {
            "arc_v1_lqr"
        }
    }

    fn act(&mut self, state: &State, obs: &Observation, params: &ParamMap) -> ControlAction {
        let g = ArcGains::from_params(params);
        let risk = g.risk(state);
        let (scale, dmg_scale) = match self.meta.as_mut() {
            Some(meta) => {
                let m = meta.observe(obs.perf, rumination_proxy(state, &g, risk));
                (m, meta.narrative_gain())
            }
            None => (1.0, 1.0),
        };
        let raw = lqr_output(state, g.a_safe, g.s_safe);
        let v = Vector3::new(raw.x * dmg_scale, raw.y * scale, raw.z * scale);
        compose(&v, state, &g, risk, scale)
    }

    fn reset(&mut self) {
        if let Some(meta) = self.meta.as_mut() {
            meta.reset();
        }
    }
}

/// LQR plus narrative and arousal integral action.
#[derive(Debug, Clone, Default)]
pub struct ArcLqi {
    integrals: LqiIntegrals,
}

impl ArcLqi {
    /// Create an LQI controller with zeroed integrals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current `(narrative, arousal)` integrals.
    pub const fn integrals(&self) -> (f64, f64) {
        self.integrals.values()
    }
}

impl Controller for ArcLqi {
    fn name(&self) -> &'static str {
        "arc_v1_lqi"
    }

    fn act(&mut self, state: &State, _obs: &Observation, params: &ParamMap) -> ControlAction {
        let g = ArcGains::from_params(params);
        let v = self.integrals.output(state, g.a_safe, g.s_safe, g.lqi_s_tau);
        compose(&v, state, &g, g.risk(state), 1.0)
    }

    fn reset(&mut self) {
        self.integrals.reset();
    }
}
