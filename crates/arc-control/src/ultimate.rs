//! Blend of integral LQR and the predictive correction under a meta loop
//! weighted toward anti-rumination.

use arc_types::{ControlAction, Observation, ParamMap, State, clip01};
use nalgebra::Vector3;

use crate::controller::{ArcGains, Controller};
use crate::lqr::{LqiIntegrals, compose, error_vector};
use crate::meta::MetaGain;
use crate::mpc::Mpc;

const LQI_WEIGHT: f64 = 0.65;
const MPC_WEIGHT: f64 = 0.35;
const META_PERIOD: usize = 15;

/// Risk proxy dominated by narrative and rumination excess.
fn narrative_proxy(state: &State, gains: &ArcGains, risk: f64) -> f64 {
    clip01(0.4 * risk + gains.narrative_excess(state) + 1.5 * gains.rumination_excess(state))
}

/// `0.65 * LQI + 0.35 * gain * MPC` on suppression, calming, and attention.
#[derive(Debug, Clone)]
pub struct ArcUltimate {
    lqi: LqiIntegrals,
    mpc: Mpc,
    meta: MetaGain,
}

impl ArcUltimate {
    /// Create the blended controller with fresh integrators and meta loop.
    pub fn new() -> Self {
        Self {
            lqi: LqiIntegrals::default(),
            mpc: Mpc::new(),
            meta: MetaGain::new(META_PERIOD),
        }
    }

    /// Current meta multiplier.
    pub const fn gain(&self) -> f64 {
        self.meta.gain()
    }
}

impl Default for ArcUltimate {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for ArcUltimate {
    fn name(&self) -> &'static str {
        "arc_ultimate"
    }

    fn act(&mut self, state: &State, obs: &Observation, params: &ParamMap) -> ControlAction {
        let g = ArcGains::from_params(params);
        let risk = g.risk(state);
        let m = self.meta.observe(obs.perf, narrative_proxy(state, &g, risk));

        let lqi = self.lqi.output(state, g.a_safe, g.s_safe, g.lqi_s_tau);
        let mpc = self.mpc.solve(&error_vector(state, g.a_safe, g.s_safe));
        let scale = Vector3::new(self.meta.narrative_gain(), m, m);
        let blended = (lqi * LQI_WEIGHT + mpc.component_mul(&scale) * MPC_WEIGHT).map(clip01);

        compose(&blended, state, &g, risk, m)
    }

    fn reset(&mut self) {
        self.lqi.reset();
        self.meta.reset();
    }
}
