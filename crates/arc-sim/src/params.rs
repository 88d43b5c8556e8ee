//! Typed view of the plant constants.
//!
//! [`SimParams::from_map`] is called once per run. Every key is required:
//! the plant has no built-in defaults, so a missing constant fails the run
//! before the first step.

use arc_types::{ParamError, ParamMap, State};

/// Constants of the plant model, initial state, and performance score.
#[derive(Debug, Clone, PartialEq)]
pub struct SimParams {
    // Initial / resting state
    /// Resting integration.
    pub phi0: f64,
    /// Resting workspace gain.
    pub g0: f64,
    /// Resting precision.
    pub p0: f64,
    /// Resting attention.
    pub i0: f64,
    /// Resting narrative intensity.
    pub s0: f64,
    /// Resting valence.
    pub v0: f64,
    /// Resting arousal.
    pub a0: f64,
    /// Resting fast memory.
    pub mf0: f64,
    /// Resting slow memory.
    pub ms0: f64,
    /// Baseline uncertainty, used as the initial `u`.
    pub u_base: f64,

    // Attention and precision
    /// Uncertainty reduction per unit of attention boost.
    pub k_u_att: f64,
    /// Attention gain from the attention channel.
    pub k_i_att: f64,
    /// Attention drain from uncertainty.
    pub k_i_u: f64,
    /// Precision loss from prediction error.
    pub k_p_pe: f64,
    /// Precision loss from uncertainty.
    pub k_p_u: f64,
    /// Precision gain from attention.
    pub k_p_i: f64,

    // Workspace gain and integration
    /// Gain growth from attention.
    pub k_g_i: f64,
    /// Gain growth from precision.
    pub k_g_p: f64,
    /// Gain loss from uncertainty.
    pub k_g_u: f64,
    /// Gain loss from excess arousal.
    pub k_g_a: f64,
    /// Integration growth from `g * p`.
    pub k_phi_gp: f64,

    // Narrative, arousal, valence
    /// Narrative growth from uncertainty.
    pub k_s_u: f64,
    /// Narrative growth from prediction error.
    pub k_s_pe: f64,
    /// Narrative suppression per unit of `u_dmg`.
    pub k_s_dmg: f64,
    /// Arousal growth from prediction error.
    pub k_a_pe: f64,
    /// Arousal growth from uncertainty.
    pub k_a_u: f64,
    /// Arousal growth from excess narrative.
    pub k_a_s: f64,
    /// Arousal damping per unit of `u_calm`.
    pub k_a_calm: f64,
    /// Valence response to reward.
    pub k_v_r: f64,
    /// Valence loss from prediction error.
    pub k_v_pe: f64,
    /// Valence loss from uncertainty.
    pub k_v_u: f64,
    /// Valence repair per unit of `u_reapp`.
    pub k_v_reapp: f64,

    // Relaxation rates
    /// Attention relaxation.
    pub mu_i: f64,
    /// Precision relaxation.
    pub mu_p: f64,
    /// Gain relaxation.
    pub mu_g: f64,
    /// Integration relaxation.
    pub mu_phi: f64,
    /// Narrative relaxation.
    pub mu_s: f64,
    /// Arousal relaxation.
    pub mu_a: f64,
    /// Valence relaxation.
    pub mu_v: f64,
    /// Fast-memory relaxation.
    pub mu_mf: f64,
    /// Slow-memory relaxation.
    pub mu_ms: f64,

    // Memory
    /// Write-priority weight of prediction error.
    pub w_mem_pe: f64,
    /// Write-priority weight of arousal deviation.
    pub w_mem_a: f64,
    /// Write-priority weight of valence deviation.
    pub w_mem_v: f64,
    /// Base learning rate of the fast trace.
    pub eta0: f64,
    /// Learning-rate boost from excess arousal.
    pub k_eta_a: f64,
    /// Consolidation rate from fast to slow memory.
    pub k_ms: f64,

    // Performance
    /// Capacity bonus per unit of narrative.
    pub omega_s: f64,
    /// Performance offset.
    pub perf_bias: f64,
    /// Performance slope on capacity.
    pub perf_gain: f64,
    /// Performance penalty on uncertainty.
    pub w_u: f64,
    /// Performance penalty on excess arousal.
    pub w_a: f64,
    /// Performance penalty on excess narrative.
    pub w_s: f64,

    // Safety thresholds
    /// Arousal threshold.
    pub a_safe: f64,
    /// Narrative threshold.
    pub s_safe: f64,
}

impl SimParams {
    /// Build the typed view, failing on the first missing key.
    pub fn from_map(params: &ParamMap) -> Result<Self, ParamError> {
        let r = |key: &str| params.require(key);
        Ok(Self {
            phi0: r("phi0")?,
            g0: r("g0")?,
            p0: r("p0")?,
            i0: r("i0")?,
            s0: r("s0")?,
            v0: r("v0")?,
            a0: r("a0")?,
            mf0: r("mf0")?,
            ms0: r("ms0")?,
            u_base: r("u_base")?,
            k_u_att: r("k_u_att")?,
            k_i_att: r("k_i_att")?,
            k_i_u: r("k_i_u")?,
            k_p_pe: r("k_p_pe")?,
            k_p_u: r("k_p_u")?,
            k_p_i: r("k_p_i")?,
            k_g_i: r("k_g_i")?,
            k_g_p: r("k_g_p")?,
            k_g_u: r("k_g_u")?,
            k_g_a: r("k_g_a")?,
            k_phi_gp: r("k_phi_gp")?,
            k_s_u: r("k_s_u")?,
            k_s_pe: r("k_s_pe")?,
            k_s_dmg: r("k_s_dmg")?,
            k_a_pe: r("k_a_pe")?,
            k_a_u: r("k_a_u")?,
            k_a_s: r("k_a_s")?,
            k_a_calm: r("k_a_calm")?,
            k_v_r: r("k_v_r")?,
            k_v_pe: r("k_v_pe")?,
            k_v_u: r("k_v_u")?,
            k_v_reapp: r("k_v_reapp")?,
            mu_i: r("mu_i")?,
            mu_p: r("mu_p")?,
            mu_g: r("mu_g")?,
            mu_phi: r("mu_phi")?,
            mu_s: r("mu_s")?,
            mu_a: r("mu_a")?,
            mu_v: r("mu_v")?,
            mu_mf: r("mu_mf")?,
            mu_ms: r("mu_ms")?,
            w_mem_pe: r("w_mem_pe")?,
            w_mem_a: r("w_mem_a")?,
            w_mem_v: r("w_mem_v")?,
            eta0: r("eta0")?,
            k_eta_a: r("k_eta_a")?,
            k_ms: r("k_ms")?,
            omega_s: r("omega_s")?,
            perf_bias: r("perf_bias")?,
            perf_gain: r("perf_gain")?,
            w_u: r("w_u")?,
            w_a: r("w_a")?,
            w_s: r("w_s")?,
            a_safe: r("a_safe")?,
            s_safe: r("s_safe")?,
        })
    }

    /// Resting state with `u` at the baseline uncertainty.
    ///
    /// Initial values are taken as configured; the plant clamps from the
    /// first step on.
    pub fn initial_state(&self) -> State {
        State {
            phi: self.phi0,
            g: self.g0,
            p: self.p0,
            i: self.i0,
            s: self.s0,
            v: self.v0,
            a: self.a0,
            mf: self.mf0,
            ms: self.ms0,
            u: self.u_base,
        }
    }
}
