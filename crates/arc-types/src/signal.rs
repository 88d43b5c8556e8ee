//! Signals exchanged each step between scenario, controller, and plant.
//!
//! - [`Disturbance`] -- exogenous inputs produced by a scenario.
//! - [`Observation`] -- what a controller sees besides the state.
//! - [`ControlAction`] -- the five-channel regulation command.

use serde::{Deserialize, Serialize};

use crate::bounds::{clip01, clip_reward};

/// Exogenous inputs for one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Disturbance {
    /// Prediction error in `[0, 1]`.
    pub pe: f64,
    /// Reward in `[-1, 1]`.
    pub reward: f64,
    /// Exogenous uncertainty in `[0, 1]`.
    pub u_exog: f64,
}

impl Disturbance {
    /// Build a disturbance, clipping every signal to its domain.
    pub fn bounded(pe: f64, reward: f64, u_exog: f64) -> Self {
        Self {
            pe: clip01(pe),
            reward: clip_reward(reward),
            u_exog: clip01(u_exog),
        }
    }

    /// Whether every signal is inside its domain.
    pub fn is_bounded(&self) -> bool {
        (0.0..=1.0).contains(&self.pe)
            && (-1.0..=1.0).contains(&self.reward)
            && (0.0..=1.0).contains(&self.u_exog)
    }
}

/// Per-step observation handed to a controller alongside the state.
///
/// `perf`, `ccog`, and `cap` are computed from the pre-step state so
/// multi-rate controllers can track performance without recomputing it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Prediction error this step.
    pub pe: f64,
    /// Reward this step.
    pub reward: f64,
    /// Exogenous uncertainty this step.
    pub u_exog: f64,
    /// Performance score of the current state.
    pub perf: f64,
    /// Cognitive capacity proxy of the current state.
    pub ccog: f64,
    /// Integrated capacity of the current state.
    pub cap: f64,
}

impl Observation {
    /// Observation carrying only the exogenous signals.
    ///
    /// The derived fields are zero; controllers that depend on them see a
    /// collapsed-performance reading.
    pub const fn from_disturbance(d: &Disturbance) -> Self {
        Self {
            pe: d.pe,
            reward: d.reward,
            u_exog: d.u_exog,
            perf: 0.0,
            ccog: 0.0,
            cap: 0.0,
        }
    }
}

/// Five-channel regulation command.
///
/// Every channel is in `[0, 1]`. `u_mem` is inverted: `1.0` leaves memory
/// writes unrestricted, `0.0` blocks them entirely.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlAction {
    /// Narrative suppression.
    pub u_dmg: f64,
    /// Attention boost.
    pub u_att: f64,
    /// Memory-write gate.
    pub u_mem: f64,
    /// Arousal damping.
    pub u_calm: f64,
    /// Reappraisal (valence repair).
    pub u_reapp: f64,
}

impl ControlAction {
    /// No regulation at all: every channel idle, memory ungated.
    pub const NEUTRAL: Self = Self {
        u_dmg: 0.0,
        u_att: 0.0,
        u_mem: 1.0,
        u_calm: 0.0,
        u_reapp: 0.0,
    };

    /// Channel names in their canonical order.
    pub const CHANNELS: [&'static str; 5] = ["u_dmg", "u_att", "u_mem", "u_calm", "u_reapp"];

    /// Return a copy with every channel clipped to `[0, 1]`.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            u_dmg: clip01(self.u_dmg),
            u_att: clip01(self.u_att),
            u_mem: clip01(self.u_mem),
            u_calm: clip01(self.u_calm),
            u_reapp: clip01(self.u_reapp),
        }
    }

    /// Intervention magnitude of this action.
    ///
    /// Memory blocking counts as `1 - u_mem`, so [`ControlAction::NEUTRAL`]
    /// has zero effort.
    pub fn effort(&self) -> f64 {
        self.u_dmg.abs()
            + self.u_att.abs()
            + self.u_calm.abs()
            + self.u_reapp.abs()
            + (1.0 - self.u_mem).abs()
    }

    /// Whether every channel is inside `[0, 1]`.
    pub fn is_bounded(&self) -> bool {
        [self.u_dmg, self.u_att, self.u_mem, self.u_calm, self.u_reapp]
            .iter()
            .all(|x| (0.0..=1.0).contains(x))
    }
}

impl Default for ControlAction {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_action_has_zero_effort() {
        assert!(ControlAction::NEUTRAL.effort().abs() < f64::EPSILON);
        assert_eq!(ControlAction::default(), ControlAction::NEUTRAL);
    }

    #[test]
    fn memory_block_counts_as_effort() {
        let action = ControlAction {
            u_mem: 0.25,
            ..ControlAction::NEUTRAL
        };
        assert!((action.effort() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn clamped_saturates_every_channel() {
        let wild = ControlAction {
            u_dmg: 1.4,
            u_att: -0.2,
            u_mem: 2.0,
            u_calm: 0.5,
            u_reapp: -9.0,
        };
        let tame = wild.clamped();
        assert!(tame.is_bounded());
        assert!((tame.u_dmg - 1.0).abs() < f64::EPSILON);
        assert!(tame.u_att.abs() < f64::EPSILON);
        assert!((tame.u_calm - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn bounded_disturbance_clips_each_domain() {
        let d = Disturbance::bounded(1.3, -2.0, -0.1);
        assert!(d.is_bounded());
        assert!((d.pe - 1.0).abs() < f64::EPSILON);
        assert!((d.reward + 1.0).abs() < f64::EPSILON);
        assert!(d.u_exog.abs() < f64::EPSILON);
    }

    #[test]
    fn action_serializes_with_channel_names() {
        let json = serde_json::to_value(ControlAction::NEUTRAL).unwrap_or_default();
        for name in ControlAction::CHANNELS {
            assert!(json.get(name).is_some(), "missing channel {name}");
        }
    }
}
