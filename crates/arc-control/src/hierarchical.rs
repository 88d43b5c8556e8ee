//! Multi-rate hierarchical regulation (ARC v2).
//!
//! # Loops
//!
//! - **fast**, every step: calming and attention against the arousal
//!   setpoint.
//! - **medium**, every 5 steps or immediately on high risk or narrative
//!   pressure: suppression, memory gating, reappraisal. Between updates the
//!   last output is held.
//! - **slow**, every 20 steps: adapts the arousal and narrative setpoints
//!   and the performance baseline from the trailing 20-sample window.

use arc_types::{ControlAction, Observation, ParamMap, State};

use crate::controller::{ArcGains, Controller};
use crate::history::History;
use crate::lqr::LqiIntegrals;

const MEDIUM_PERIOD: usize = 5;
const SLOW_PERIOD: usize = 20;
const MEDIUM_RISK_TRIGGER: f64 = 0.5;
const MEDIUM_NARRATIVE_TRIGGER: f64 = 0.05;
const TIGHTEN_BELOW: f64 = 0.80;
const RELAX_ABOVE: f64 = 0.95;
const TIGHTEN_STEP: f64 = 0.05;
const RELAX_STEP: f64 = 0.02;
const A_SET_FLOOR: f64 = 0.40;
const S_SET_FLOOR: f64 = 0.35;
const BASELINE_BLEND: f64 = 0.95;

/// Output of the medium loop, held between updates.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MediumHold {
    u_dmg: f64,
    u_mem: f64,
    u_reapp: f64,
}

impl MediumHold {
    const IDLE: Self = Self {
        u_dmg: 0.0,
        u_mem: 1.0,
        u_reapp: 0.0,
    };
}

/// Control law used inside the v2 schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Law {
    Proportional,
    Lqi(LqiIntegrals),
}

/// Hierarchical controller with adaptive setpoints.
#[derive(Debug, Clone)]
pub struct ArcV2 {
    law: Law,
    steps: usize,
    setpoints: Option<(f64, f64)>,
    baseline: Option<f64>,
    hold: MediumHold,
    perf: History,
    arousal: History,
    narrative: History,
}

impl ArcV2 {
    /// v2 with proportional loops.
    pub fn new() -> Self {
        Self::with_law(Law::Proportional)
    }

    /// v2 schedule with the LQI law against the adaptive setpoints.
    pub fn with_lqi() -> Self {
        Self::with_law(Law::Lqi(LqiIntegrals::default()))
    }

    fn with_law(law: Law) -> Self {
        Self {
            law,
            steps: 0,
            setpoints: None,
            baseline: None,
            hold: MediumHold::IDLE,
            perf: History::default(),
            arousal: History::default(),
            narrative: History::default(),
        }
    }

    /// Current `(a_set, s_set)`, once the first step has seeded them.
    pub const fn setpoints(&self) -> Option<(f64, f64)> {
        self.setpoints
    }

    /// Current performance baseline, once the first slow update has run.
    pub const fn baseline(&self) -> Option<f64> {
        self.baseline
    }

    fn slow_update(&mut self, gains: &ArcGains, a_set: f64, s_set: f64) -> (f64, f64) {
        let (Some(perf), Some(arousal), Some(narrative)) =
            (self.perf.mean(), self.arousal.mean(), self.narrative.mean())
        else {
            return (a_set, s_set);
        };
        let baseline = self.baseline.unwrap_or(perf);
        let mut next = (a_set, s_set);
        if perf < TIGHTEN_BELOW * baseline {
            next = (
                (a_set - TIGHTEN_STEP).max(A_SET_FLOOR),
                (s_set - TIGHTEN_STEP).max(S_SET_FLOOR),
            );
        } else if perf > RELAX_ABOVE * baseline && arousal < a_set && narrative < s_set {
            next = (
                (a_set + RELAX_STEP).min(gains.a_safe),
                (s_set + RELAX_STEP).min(gains.s_safe),
            );
        }
        self.baseline = Some(BASELINE_BLEND * baseline + (1.0 - BASELINE_BLEND) * perf);
        next
    }
}

impl Default for ArcV2 {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for ArcV2 {
    fn name(&self) -> &'static str {
        match self.law {
            Law::Proportional => "arc_v2_hier",
            Law::Lqi(_) => "arc_v2_lqi",
        }
    }

    fn act(&mut self, state: &State, obs: &Observation, params: &ParamMap) -> ControlAction {
        let g = ArcGains::from_params(params);
        let (a_set, s_set) = self.setpoints.unwrap_or((g.a_safe, g.s_safe));
        let step = self.steps;
        self.steps = self.steps.saturating_add(1);

        self.perf.push(obs.perf);
        self.arousal.push(state.a);
        self.narrative.push(state.s);

        let risk = g.risk_against(state, a_set, s_set);
        let a_ex = (state.a - a_set).max(0.0);

        let (u_calm, u_att, lqi_dmg) = match &mut self.law {
            Law::Proportional => (
                (g.k_calm * a_ex).min(1.0),
                g.attention(state, a_ex, 1.0),
                None,
            ),
            Law::Lqi(integrals) => {
                let v = integrals.output(state, a_set, s_set, g.lqi_s_tau);
                (v.y, v.z, Some(v.x))
            }
        };

        let medium_due = step % MEDIUM_PERIOD == 0
            || risk > MEDIUM_RISK_TRIGGER
            || state.s - s_set > MEDIUM_NARRATIVE_TRIGGER;
        if medium_due {
            self.hold = MediumHold {
                u_dmg: lqi_dmg.unwrap_or_else(|| (g.k_dmg * risk).min(1.0)),
                u_mem: g.memory_gate(risk, 1.0),
                u_reapp: g.reappraisal(state, risk, 1.0),
            };
        }

        let mut setpoints = (a_set, s_set);
        if self.steps % SLOW_PERIOD == 0 {
            setpoints = self.slow_update(&g, a_set, s_set);
        }
        self.setpoints = Some(setpoints);

        ControlAction {
            u_dmg: self.hold.u_dmg,
            u_att,
            u_mem: self.hold.u_mem,
            u_calm,
            u_reapp: self.hold.u_reapp,
        }
        .clamped()
    }

    fn reset(&mut self) {
        *self = Self::with_law(match self.law {
            Law::Proportional => Law::Proportional,
            Law::Lqi(_) => Law::Lqi(LqiIntegrals::default()),
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::controller::tests::{obs, state};

    #[test]
    fn medium_loop_holds_between_updates() {
        let mut c = ArcV2::new();
        let params = ParamMap::new();
        let first = c.act(&state(0.3, 0.3, 0.2), &obs(0.8), &params);
        // Uncertainty rises but no trigger fires: suppression is held.
        let held = c.act(&state(0.3, 0.3, 0.6), &obs(0.8), &params);
        assert!((held.u_dmg - first.u_dmg).abs() < f64::EPSILON);
        assert!(held.u_att > first.u_att);
    }

    #[test]
    fn narrative_pressure_forces_medium_update() {
        let mut c = ArcV2::new();
        let params = ParamMap::new();
        let first = c.act(&state(0.3, 0.3, 0.2), &obs(0.8), &params);
        let urgent = c.act(&state(0.3, 0.7, 0.2), &obs(0.8), &params);
        assert!(urgent.u_dmg > first.u_dmg);
    }

    #[test]
    fn poor_performance_tightens_setpoints_to_floors() {
        let mut c = ArcV2::new();
        let params = ParamMap::new();
        // Seed the baseline with good performance.
        for _ in 0..20 {
            c.act(&state(0.3, 0.3, 0.2), &obs(0.9), &params);
        }
        let (a0, s0) = c.setpoints().unwrap();
        assert!((c.baseline().unwrap() - 0.9).abs() < 1e-12);
        for _ in 0..400 {
            c.act(&state(0.3, 0.3, 0.2), &obs(0.3), &params);
        }
        let (a1, s1) = c.setpoints().unwrap();
        assert!(a1 < a0 && s1 < s0);
        assert!((a1 - 0.40).abs() < 1e-12);
        assert!((s1 - 0.35).abs() < 1e-12);
    }

    #[test]
    fn good_performance_relaxes_up_to_thresholds() {
        let mut c = ArcV2::new();
        let params = ParamMap::new();
        for _ in 0..20 {
            c.act(&state(0.3, 0.3, 0.2), &obs(0.9), &params);
        }
        for _ in 0..60 {
            c.act(&state(0.3, 0.3, 0.2), &obs(0.2), &params);
        }
        let (a_tight, _) = c.setpoints().unwrap();
        assert!(a_tight < 0.6);
        for _ in 0..2_000 {
            c.act(&state(0.1, 0.1, 0.2), &obs(0.95), &params);
        }
        let (a, s) = c.setpoints().unwrap();
        assert!((a - 0.60).abs() < 1e-12);
        assert!((s - 0.55).abs() < 1e-12);
    }

    #[test]
    fn reset_clears_schedule_and_keeps_law() {
        let mut c = ArcV2::with_lqi();
        for _ in 0..45 {
            c.act(&state(0.8, 0.8, 0.7), &obs(0.3), &ParamMap::new());
        }
        c.reset();
        assert!(c.setpoints().is_none());
        assert!(c.baseline().is_none());
        assert_eq!(c.name(), "arc_v2_lqi");
    }
}
