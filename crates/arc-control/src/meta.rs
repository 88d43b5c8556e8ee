//! Meta-control: a slow loop that rescales a base controller's gains.
//!
//! [`MetaGain`] keeps a scalar multiplier in `[0.5, 1.6]`. Every `period`
//! steps it looks at the trailing performance and risk windows. Poor
//! performance or high risk pushes the multiplier toward its maximum; good
//! performance with low risk lets it decay toward its minimum. Narrative
//! suppression is always scaled by `max(gain, 1)`, so the meta loop can
//! strengthen anti-rumination but never relax it.

use arc_types::{ControlAction, Observation, ParamMap, State, clip01};

use crate::controller::{ArcGains, Controller};
use crate::history::History;
use crate::proportional::proportional_law;

/// Update period of the v3 meta loop, in steps.
pub const META_PERIOD: usize = 20;

/// Lower bound of the meta multiplier.
pub const META_MIN: f64 = 0.5;

/// Upper bound of the meta multiplier.
pub const META_MAX: f64 = 1.6;

const POOR_PERF: f64 = 0.75;
const HIGH_RISK: f64 = 0.35;
const LOW_RISK: f64 = 0.15;
const BOOST_RATE: f64 = 0.25;
const DECAY_RATE: f64 = 0.20;

/// Risk proxy that adds the narrative and rumination excesses to risk.
pub fn rumination_proxy(state: &State, gains: &ArcGains, risk: f64) -> f64 {
    clip01(risk + 0.5 * gains.narrative_excess(state) + 0.5 * gains.rumination_excess(state))
}

/// Scalar gain multiplier with a periodic update.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaGain {
    gain: f64,
    period: usize,
    steps: usize,
    perf: History,
    risk: History,
}

impl MetaGain {
    /// A multiplier of `1.0` updated every `period` observations.
    pub fn new(period: usize) -> Self {
        Self {
            gain: 1.0,
            period: period.max(1),
            steps: 0,
            perf: History::default(),
            risk: History::default(),
        }
    }

    /// Record one step and return the multiplier to use for it.
    pub fn observe(&mut self, perf: f64, risk: f64) -> f64 {
        self.perf.push(perf);
        self.risk.push(risk);
        self.steps = self.steps.saturating_add(1);
        if self.steps % self.period == 0 {
            self.update();
        }
        self.gain
    }

    fn update(&mut self) {
        let (Some(perf), Some(risk)) = (self.perf.mean(), self.risk.mean()) else {
            return;
        };
        if perf < POOR_PERF || risk > HIGH_RISK {
            self.gain += BOOST_RATE * (META_MAX - self.gain);
        } else if risk < LOW_RISK {
            self.gain -= DECAY_RATE * (self.gain - META_MIN);
        }
        self.gain = self.gain.clamp(META_MIN, META_MAX);
    }

    /// Current multiplier.
    pub const fn gain(&self) -> f64 {
        self.gain
    }

    /// Multiplier for narrative suppression, floored at `1.0`.
    pub fn narrative_gain(&self) -> f64 {
        self.gain.max(1.0)
    }

    /// Return to a multiplier of `1.0` with empty windows.
    pub fn reset(&mut self) {
        *self = Self::new(self.period);
    }
}

/// ARC v3: the proportional law under a 20-step meta loop.
#[derive(Debug, Clone)]
pub struct ArcV3 {
    meta: MetaGain,
}

impl ArcV3 {
    /// Create a v3 controller with a fresh meta loop.
    pub fn new() -> Self {
        Self {
            meta: MetaGain::new(META_PERIOD),
        }
    }

    /// Current meta multiplier.
    pub const fn gain(&self) -> f64 {
        self.meta.gain()
    }
}

impl Default for ArcV3 {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for ArcV3 {
    fn name(&self) -> &'static str {
        "arc_v3_meta"
    }

    fn act(&mut self, state: &State, obs: &Observation, params: &ParamMap) -> ControlAction {
        let g = ArcGains::from_params(params);
        let risk = g.risk(state);
        let scale = self.meta.observe(obs.perf, rumination_proxy(state, &g, risk));
        proportional_law(state, &g, scale)
    }

    fn reset(&mut self) {
        self.meta.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::tests::{obs, state};

    #[test]
    fn gain_only_moves_on_period_boundaries() {
        let mut meta = MetaGain::new(20);
        for _ in 0..19 {
            assert!((meta.observe(0.2, 0.9) - 1.0).abs() < f64::EPSILON);
        }
        let boosted = meta.observe(0.2, 0.9);
        assert!((boosted - (1.0 + 0.25 * 0.6)).abs() < 1e-12);
    }

    #[test]
    fn good_runs_decay_toward_minimum() {
        let mut meta = MetaGain::new(20);
        for _ in 0..2_000 {
            meta.observe(0.95, 0.05);
        }
        assert!(meta.gain() >= META_MIN);
        assert!(meta.gain() < 0.51);
        assert!((meta.narrative_gain() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn poor_runs_saturate_below_maximum() {
        let mut meta = MetaGain::new(20);
        for _ in 0..2_000 {
            meta.observe(0.1, 0.9);
        }
        assert!(meta.gain() <= META_MAX);
        assert!(meta.gain() > 1.55);
    }

    #[test]
    fn middling_runs_hold_the_gain() {
        let mut meta = MetaGain::new(20);
        for _ in 0..200 {
            meta.observe(0.85, 0.25);
        }
        assert!((meta.gain() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn suppression_never_drops_below_unmodulated_value() {
        let params = ParamMap::new();
        let calm = state(0.3, 0.58, 0.2);
        let mut v3 = ArcV3::new();
        for _ in 0..400 {
            v3.act(&calm, &obs(0.95), &params);
        }
        assert!(v3.gain() < 1.0);
        let relaxed = v3.act(&calm, &obs(0.95), &params);
        let nominal = proportional_law(&calm, &ArcGains::default(), 1.0);
        assert!(relaxed.u_dmg >= nominal.u_dmg);
        assert!(relaxed.u_mem >= nominal.u_mem);
    }

    #[test]
    fn reset_restores_unit_gain() {
        let mut v3 = ArcV3::new();
        for _ in 0..60 {
            v3.act(&state(1.0, 1.0, 1.0), &obs(0.1), &ParamMap::new());
        }
        assert!(v3.gain() > 1.0);
        v3.reset();
        assert!((v3.gain() - 1.0).abs() < f64::EPSILON);
    }
}
