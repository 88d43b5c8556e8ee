//! The controller seam and the gains every control law shares.
//!
//! All variants compute the same bounded **risk** signal from uncertainty
//! and the arousal and narrative excesses over their safety thresholds.
//! The laws differ only in how they map risk and state errors to the five
//! action channels.

use std::fmt::Debug;

use arc_types::{ControlAction, Observation, ParamMap, State, clip01};

/// A regulation policy.
///
/// The orchestrator calls [`act`](Controller::act) once per step with the
/// state entering that step and the step's observation. Stateful variants
/// keep their counters and history between calls; those persist for the
/// whole run and are cleared only by [`reset`](Controller::reset) or by
/// building a fresh instance.
pub trait Controller: Send + Debug {
    /// Stable short name, as used in configs and reports.
    fn name(&self) -> &'static str;

    /// Compute the action for the current step.
    ///
    /// Every channel of the returned action is inside `[0, 1]`.
    fn act(&mut self, state: &State, obs: &Observation, params: &ParamMap) -> ControlAction;

    /// Clear all run-local state. Stateless controllers keep the default.
    fn reset(&mut self) {}
}

/// Gains and thresholds shared by the ARC family.
///
/// Each key falls back to a documented default when absent, so a
/// controller can run against a partial mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGains {
    /// Arousal safety threshold (`a_safe`, default `0.60`).
    pub a_safe: f64,
    /// Narrative safety threshold (`s_safe`, default `0.55`).
    pub s_safe: f64,
    /// Rumination threshold (`s_rum_tau`, default `0.60`).
    pub s_rum_tau: f64,
    /// Risk weight on uncertainty (`arc_w_u`, default `0.40`).
    pub w_u: f64,
    /// Risk weight on excess arousal (`arc_w_a`, default `0.30`).
    pub w_a: f64,
    /// Risk weight on excess narrative (`arc_w_s`, default `0.35`).
    pub w_s: f64,
    /// Narrative suppression gain (`arc_k_dmg`, default `0.95`).
    pub k_dmg: f64,
    /// Attention gain (`arc_k_att`, default `0.75`).
    pub k_att: f64,
    /// Memory-block gain (`arc_k_mem_block`, default `0.80`).
    pub k_mem_block: f64,
    /// Calming gain (`arc_k_calm`, default `0.85`).
    pub k_calm: f64,
    /// Reappraisal gain (`arc_k_reapp`, default `0.50`).
    pub k_reapp: f64,
    /// PID proportional gain (`pid_k_p`, default `1.0`).
    pub pid_k_p: f64,
    /// PID integral gain (`pid_k_i`, default `0.05`).
    pub pid_k_i: f64,
    /// PID derivative gain (`pid_k_d`, default `0.10`).
    pub pid_k_d: f64,
    /// PID anti-windup limit (`pid_i_limit`, default `2.0`).
    pub pid_i_limit: f64,
    /// LQI rumination threshold for the narrative integral (`lqi_s_tau`,
    /// default `0.45`).
    pub lqi_s_tau: f64,
}

impl ArcGains {
    /// Read the shared gains, applying the documented defaults.
    pub fn from_params(params: &ParamMap) -> Self {
        Self {
            a_safe: params.get_or("a_safe", 0.60),
            s_safe: params.get_or("s_safe", 0.55),
            s_rum_tau: params.get_or("s_rum_tau", 0.60),
            w_u: params.get_or("arc_w_u", 0.40),
            w_a: params.get_or("arc_w_a", 0.30),
            w_s: params.get_or("arc_w_s", 0.35),
            k_dmg: params.get_or("arc_k_dmg", 0.95),
            k_att: params.get_or("arc_k_att", 0.75),
            k_mem_block: params.get_or("arc_k_mem_block", 0.80),
            k_calm: params.get_or("arc_k_calm", 0.85),
            k_reapp: params.get_or("arc_k_reapp", 0.50),
            pid_k_p: params.get_or("pid_k_p", 1.0),
            pid_k_i: params.get_or("pid_k_i", 0.05),
            pid_k_d: params.get_or("pid_k_d", 0.10),
            pid_i_limit: params.get_or("pid_i_limit", 2.0),
            lqi_s_tau: params.get_or("lqi_s_tau", 0.45),
        }
    }

    /// Arousal above the safety threshold, floored at zero.
    pub fn arousal_excess(&self, state: &State) -> f64 {
        (state.a - self.a_safe).max(0.0)
    }

    /// Narrative above the safety threshold, floored at zero.
    pub fn narrative_excess(&self, state: &State) -> f64 {
        (state.s - self.s_safe).max(0.0)
    }

    /// Narrative above the rumination threshold, floored at zero.
    pub fn rumination_excess(&self, state: &State) -> f64 {
        (state.s - self.s_rum_tau).max(0.0)
    }

    /// Common risk signal against the configured thresholds.
    pub fn risk(&self, state: &State) -> f64 {
        self.risk_against(state, self.a_safe, self.s_safe)
    }

    /// Risk signal against explicit setpoints (used by adaptive-setpoint
    /// laws).
    pub fn risk_against(&self, state: &State, a_set: f64, s_set: f64) -> f64 {
        clip01(
            self.w_u * state.u
                + self.w_a * (state.a - a_set).max(0.0)
                + self.w_s * (state.s - s_set).max(0.0),
        )
    }

    /// Memory gate for a given risk: `1 - min(1, scale * k_mem_block * risk)`.
    pub fn memory_gate(&self, risk: f64, scale: f64) -> f64 {
        1.0 - (scale * self.k_mem_block * risk).min(1.0)
    }

    /// Reappraisal for a given risk: `min(1, scale * k_reapp * u * (1 - risk))`.
    pub fn reappraisal(&self, state: &State, risk: f64, scale: f64) -> f64 {
        (scale * self.k_reapp * state.u * (1.0 - risk)).min(1.0)
    }

    /// Attention boost: `min(1, scale * k_att * u * (1 - a_excess))`.
    pub fn attention(&self, state: &State, a_excess: f64, scale: f64) -> f64 {
        (scale * self.k_att * state.u * (1.0 - a_excess)).min(1.0)
    }
}

impl Default for ArcGains {
    fn default() -> Self {
        Self::from_params(&ParamMap::new())
    }
}
