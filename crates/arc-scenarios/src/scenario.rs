//! Disturbance laws.
//!
//! Every law has the same shape: step index, caller-owned generator, and an
//! optional view of the current state. Uniform draws are taken in a fixed
//! order per law (prediction-error noise first, reward noise second) so a
//! given seed always yields the same program.

use std::fmt;

use arc_types::{Disturbance, State};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::params::ScenarioParams;

/// Arousal assumed by state-coupled laws when no state is supplied.
const NEUTRAL_AROUSAL: f64 = 0.5;

/// Period of the `goal_conflict` reward cycle.
const GOAL_CYCLE: usize = 30;

/// Block length of the `gaslighting` base reward.
const GASLIGHT_BLOCK: usize = 20;

/// Which disturbance law a [`Scenario`] follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Uncertainty jumps to its shock level at the onset and stays there.
    SuddenThreat,
    /// Reward sign flips from positive to negative at the onset.
    RewardFlip,
    /// Prediction error spikes for a fixed window after the onset.
    NoiseBurst,
    /// Three phases: familiar task, shifted task, familiar task again.
    DistributionShift,
    /// Reward sign alternates every cycle with a transition spike.
    GoalConflict,
    /// Sustained high, oscillating prediction error with contradictory reward.
    SustainedContradiction,
    /// Rewards randomly contradict the current block's sign.
    Gaslighting,
    /// Two opposing periodic instructions; conflict drives error and uncertainty.
    InstructionConflict,
    /// State-coupled: high arousal is rewarded, calm is punished.
    AdversarialCoupling,
    /// Random reward jackpots uncorrelated with anything.
    RandomDopamine,
}

impl ScenarioKind {
    /// Every law, in catalog order.
    pub const ALL: [Self; 10] = [
        Self::SuddenThreat,
        Self::RewardFlip,
        Self::NoiseBurst,
        Self::DistributionShift,
        Self::GoalConflict,
        Self::SustainedContradiction,
        Self::Gaslighting,
        Self::InstructionConflict,
        Self::AdversarialCoupling,
        Self::RandomDopamine,
    ];

    /// Stable short name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::SuddenThreat => "sudden_threat",
            Self::RewardFlip => "reward_flip",
            Self::NoiseBurst => "noise_burst",
            Self::DistributionShift => "distribution_shift",
            Self::GoalConflict => "goal_conflict",
            Self::SustainedContradiction => "sustained_contradiction",
            Self::Gaslighting => "gaslighting",
            Self::InstructionConflict => "instruction_conflict",
            Self::AdversarialCoupling => "adversarial_coupling",
            Self::RandomDopamine => "random_dopamine",
        }
    }

    /// Whether the law reads the agent's state.
    pub const fn is_state_coupled(self) -> bool {
        matches!(self, Self::AdversarialCoupling | Self::RandomDopamine)
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named disturbance program.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// The disturbance law.
    pub kind: ScenarioKind,
    /// Number of steps in a run.
    pub horizon: usize,
    /// Step at which the scenario's perturbation begins.
    pub onset: usize,
    levels: ScenarioParams,
}

impl Scenario {
    /// Build a scenario of `kind` from the shared scenario constants.
    ///
    /// The onset is `shock_t` for the shock-style laws and fixed for the
    /// others (`50` for `distribution_shift`, `30` for `goal_conflict`,
    /// `0` for the stress tests).
    pub fn new(kind: ScenarioKind, params: &ScenarioParams) -> Self {
        let onset = match kind {
            ScenarioKind::SuddenThreat | ScenarioKind::RewardFlip | ScenarioKind::NoiseBurst => {
                params.shock_t
            }
            ScenarioKind::DistributionShift => 50,
            ScenarioKind::GoalConflict => GOAL_CYCLE,
            ScenarioKind::SustainedContradiction
            | ScenarioKind::Gaslighting
            | ScenarioKind::InstructionConflict
            | ScenarioKind::AdversarialCoupling
            | ScenarioKind::RandomDopamine => 0,
        };
        Self {
            kind,
            horizon: params.horizon,
            onset,
            levels: params.clone(),
        }
    }

    /// Stable short name of the scenario.
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Disturbance at step `t`.
    ///
    /// `state` is the agent's state entering step `t`, or `None` when it is
    /// not available; state-coupled laws then assume neutral arousal.
    /// Outputs are always inside their domains.
    #[allow(clippy::cast_precision_loss)]
    pub fn generate<R: Rng>(&self, t: usize, rng: &mut R, state: Option<&State>) -> Disturbance {
        let lv = &self.levels;
        let tf = t as f64;

        match self.kind {
            ScenarioKind::SuddenThreat => {
                let (pe_shift, r_base, u) = if t >= self.onset {
                    (0.15, 0.1, lv.u_shock)
                } else {
                    (0.0, 0.2, lv.u_base)
                };
                let pe = lv.pe_base + pe_shift + rng.random::<f64>() * lv.pe_noise;
                let r = r_base + jitter(rng, 0.1);
                Disturbance::bounded(pe, r, u)
            }
            ScenarioKind::RewardFlip => {
                let surprise = if t == self.onset { 0.2 } else { 0.0 };
                let pe = lv.pe_base + rng.random::<f64>() * lv.pe_noise + surprise;
                let sign = if t < self.onset { 0.3 } else { -0.3 };
                let r = sign + jitter(rng, 0.1);
                Disturbance::bounded(pe, r, lv.u_base)
            }
            ScenarioKind::NoiseBurst => {
                let burst = t >= self.onset && t < self.onset.saturating_add(lv.burst_len);
                let (pe_level, r_base) = if burst { (0.65, 0.05) } else { (lv.pe_base, 0.2) };
                let pe = pe_level + rng.random::<f64>() * lv.pe_noise;
                let r = r_base + jitter(rng, 0.1);
                Disturbance::bounded(pe, r, lv.u_base)
            }
            ScenarioKind::DistributionShift => {
                if (50..100).contains(&t) {
                    let pe = 0.4 + rng.random::<f64>() * 0.2;
                    let r = -0.2 + jitter(rng, 0.2);
                    Disturbance::bounded(pe, r, 0.6 * lv.u_shock)
                } else {
                    let pe = lv.pe_base + rng.random::<f64>() * lv.pe_noise;
                    let r = 0.4 + jitter(rng, 0.1);
                    Disturbance::bounded(pe, r, lv.u_base)
                }
            }
            ScenarioKind::GoalConflict => {
                let pos = t % GOAL_CYCLE;
                let u_spike = if pos < 5 { 0.1 } else { 0.0 };
                let pe_spike = if pos < 3 { 0.15 } else { 0.0 };
                let u = lv.u_base + u_spike;
                let pe = lv.pe_base + pe_spike + rng.random::<f64>() * lv.pe_noise;
                let sign = if (t / GOAL_CYCLE) % 2 == 0 { 0.3 } else { -0.3 };
                let r = sign + jitter(rng, 0.1);
                Disturbance::bounded(pe, r, u)
            }
            ScenarioKind::SustainedContradiction => {
                let pe = 0.5 + 0.3 * (0.3 * tf).sin() + rng.random::<f64>() * 0.1;
                let r = 0.3 * (0.3f64.mul_add(tf, 1.5)).cos() + jitter(rng, 0.15);
                Disturbance::bounded(pe, r, 0.8 * lv.u_shock)
            }
            ScenarioKind::Gaslighting => {
                let base = if (t / GASLIGHT_BLOCK) % 2 == 0 { 0.3 } else { -0.3 };
                if rng.random::<f64>() < 0.15 {
                    let pe = 0.6 + rng.random::<f64>() * 0.2;
                    Disturbance::bounded(pe, -base, 0.7 * lv.u_shock)
                } else {
                    let pe = lv.pe_base + rng.random::<f64>() * lv.pe_noise;
                    Disturbance::bounded(pe, base, lv.u_base)
                }
            }
            ScenarioKind::InstructionConflict => {
                let a = 0.4 * (0.2 * tf).sin();
                let b = 0.4 * (0.2f64.mul_add(tf, 0.5)).cos();
                let conflict = (a - b).abs();
                let pe = 0.2 + conflict + rng.random::<f64>() * 0.1;
                let r = (a + b) * 0.5 + jitter(rng, 0.1);
                Disturbance::bounded(pe, r, lv.u_base + 0.3 * conflict)
            }
            ScenarioKind::AdversarialCoupling => {
                let arousal = state.map_or(NEUTRAL_AROUSAL, |s| s.a);
                if arousal > 0.7 {
                    let pe = 0.1 + rng.random::<f64>() * 0.1;
                    Disturbance::bounded(pe, 0.5, lv.u_base)
                } else {
                    let pe = 0.8 + rng.random::<f64>() * 0.1;
                    Disturbance::bounded(pe, -0.2, lv.u_shock)
                }
            }
            ScenarioKind::RandomDopamine => {
                if rng.random::<f64>() < 0.1 {
                    Disturbance::bounded(0.0, 0.8, lv.u_base)
                } else {
                    let pe = 0.5 + rng.random::<f64>() * 0.5;
                    Disturbance::bounded(pe, -0.1, lv.u_base)
                }
            }
        }
    }
}

/// Zero-mean uniform noise of total width `width`.
fn jitter<R: Rng>(rng: &mut R, width: f64) -> f64 {
    (rng.random::<f64>() - 0.5) * width
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn params() -> ScenarioParams {
        ScenarioParams {
            horizon: 160,
            shock_t: 50,
            u_base: 0.2,
            u_shock: 0.8,
            pe_base: 0.1,
            pe_noise: 0.1,
            burst_len: 20,
        }
    }

    #[test]
    fn sudden_threat_raises_uncertainty_at_onset() {
        let sc = Scenario::new(ScenarioKind::SuddenThreat, &params());
        let mut rng = SmallRng::seed_from_u64(42);
        assert!((sc.generate(49, &mut rng, None).u_exog - 0.2).abs() < 1e-12);
        assert!((sc.generate(50, &mut rng, None).u_exog - 0.8).abs() < 1e-12);
    }

    #[test]
    fn reward_flip_changes_sign() {
        let sc = Scenario::new(ScenarioKind::RewardFlip, &params());
        let mut rng = SmallRng::seed_from_u64(42);
        for t in 0..50 {
            assert!(sc.generate(t, &mut rng, None).reward > 0.2);
        }
        for t in 50..160 {
            assert!(sc.generate(t, &mut rng, None).reward < -0.2);
        }
    }

    #[test]
    fn noise_burst_window_is_half_open() {
        let sc = Scenario::new(ScenarioKind::NoiseBurst, &params());
        let mut rng = SmallRng::seed_from_u64(42);
        assert!(sc.generate(49, &mut rng, None).pe < 0.21);
        assert!(sc.generate(50, &mut rng, None).pe >= 0.65);
        assert!(sc.generate(69, &mut rng, None).pe >= 0.65);
        assert!(sc.generate(70, &mut rng, None).pe < 0.21);
    }

    #[test]
    fn adversarial_coupling_defaults_to_neutral_arousal() {
        let sc = Scenario::new(ScenarioKind::AdversarialCoupling, &params());
        let mut rng = SmallRng::seed_from_u64(42);
        let d = sc.generate(0, &mut rng, None);
        assert!((d.reward + 0.2).abs() < 1e-12);
        assert!((d.u_exog - 0.8).abs() < 1e-12);
    }

    #[test]
    fn adversarial_coupling_rewards_high_arousal() {
        let sc = Scenario::new(ScenarioKind::AdversarialCoupling, &params());
        let mut rng = SmallRng::seed_from_u64(42);
        let stressed = State {
            phi: 0.8,
            g: 0.8,
            p: 0.8,
            i: 0.8,
            s: 0.5,
            v: 0.5,
            a: 0.9,
            mf: 0.2,
            ms: 0.2,
            u: 0.2,
        };
        let d = sc.generate(10, &mut rng, Some(&stressed));
        assert!((d.reward - 0.5).abs() < 1e-12);
        assert!(d.pe <= 0.2);
    }

    #[test]
    fn onsets_follow_catalog_rules() {
        let p = params();
        assert_eq!(Scenario::new(ScenarioKind::NoiseBurst, &p).onset, 50);
        assert_eq!(Scenario::new(ScenarioKind::DistributionShift, &p).onset, 50);
        assert_eq!(Scenario::new(ScenarioKind::GoalConflict, &p).onset, 30);
        assert_eq!(Scenario::new(ScenarioKind::Gaslighting, &p).onset, 0);
    }

    #[test]
    fn kind_serializes_as_short_name() {
        for kind in ScenarioKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
    }
}
