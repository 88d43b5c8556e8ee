//! PID regulation with anti-windup, plain and meta-modulated.

use arc_types::{ControlAction, Observation, ParamMap, State, clip, clip01};

use crate::controller::{ArcGains, Controller};
use crate::meta::{MetaGain, rumination_proxy};

/// One PID loop with a clamped integral.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PidChannel {
    integral: f64,
    prev_error: Option<f64>,
}

/// Proportional, integral, and derivative gains of one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidGains {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain.
    pub ki: f64,
    /// Derivative gain.
    pub kd: f64,
}

impl PidGains {
    /// Every gain multiplied by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            kp: self.kp * factor,
            ki: self.ki * factor,
            kd: self.kd * factor,
        }
    }
}

impl PidChannel {
    /// Feed one error sample and return the channel output in `[0, 1]`.
    ///
    /// The integral is clamped to `[-limit, limit]` after accumulation. The
    /// derivative is the backward difference to the previous error, zero on
    /// the first sample.
    pub fn update(&mut self, error: f64, gains: PidGains, limit: f64) -> f64 {
        self.integral = clip(self.integral + error, -limit, limit);
        let derivative = self.prev_error.map_or(0.0, |prev| error - prev);
        self.prev_error = Some(error);
        clip01(gains.kp * error + gains.ki * self.integral + gains.kd * derivative)
    }

    /// Current integral value.
    pub const fn integral(&self) -> f64 {
        self.integral
    }

    /// Zero the integral and forget the previous error.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Three-channel PID on risk, arousal error, and narrative error.
///
/// With a meta gain attached, the gain multiplies kp, ki, and kd of every
/// channel directly; the narrative channel uses `max(gain, 1)`.
#[derive(Debug, Clone, Default)]
pub struct ArcPid {
    risk: PidChannel,
    arousal: PidChannel,
    narrative: PidChannel,
    meta: Option<MetaGain>,
}

impl ArcPid {
    /// Plain PID controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// PID controller whose gains follow a 20-step meta loop.
    pub fn with_meta() -> Self {
        Self {
            meta: Some(MetaGain::new(crate::meta::META_PERIOD)),
            ..Self::default()
        }
    }

    /// Integrals of the risk, arousal, and narrative channels.
    pub const fn integrals(&self) -> [f64; 3] {
        [
            self.risk.integral(),
            self.arousal.integral(),
            self.narrative.integral(),
        ]
    }
}

impl Controller for ArcPid {
    fn name(&self) -> &'static str {
        if self.meta.is_some() {
            "arc_v3_pid_meta"
        } else {
            "arc_v1_pid"
        }
    }

    fn act(&mut self, state: &State, obs: &Observation, params: &ParamMap) -> ControlAction {
        let g = ArcGains::from_params(params);
        let risk = g.risk(state);
        let scale = match self.meta.as_mut() {
            Some(meta) => meta.observe(obs.perf, rumination_proxy(state, &g, risk)),
            None => 1.0,
        };

        let base = PidGains {
            kp: g.pid_k_p,
            ki: g.pid_k_i,
            kd: g.pid_k_d,
        };
        let o_risk = self.risk.update(risk, base.scaled(scale), g.pid_i_limit);
        let o_a = self
            .arousal
            .update(state.a - g.a_safe, base.scaled(scale), g.pid_i_limit);
        let o_s = self
            .narrative
            .update(state.s - g.s_safe, base.scaled(scale.max(1.0)), g.pid_i_limit);

        ControlAction {
            u_dmg: (g.k_dmg * o_risk.max(o_s)).min(1.0),
            u_att: g.attention(state, g.arousal_excess(state), 1.0),
            u_mem: g.memory_gate(o_risk, 1.0),
            u_calm: (g.k_calm * o_a).min(1.0),
            u_reapp: g.reappraisal(state, o_risk, 1.0),
        }
        .clamped()
    }

    fn reset(&mut self) {
        self.risk.reset();
        self.arousal.reset();
        self.narrative.reset();
        if let Some(meta) = self.meta.as_mut() {
            meta.reset();
        }
    }
}
