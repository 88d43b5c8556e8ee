//! Quantities derived from a state.
//!
//! All three are pure and clipped to `[0, 1]` after computation.

use arc_types::{State, clip01};

use crate::params::SimParams;

/// Cognitive capacity proxy: the product `phi * g * p * i`.
pub fn ccog(state: &State) -> f64 {
    clip01(state.phi * state.g * state.p * state.i)
}

/// Integrated capacity: [`ccog`] with a small narrative bonus.
pub fn capacity(state: &State, params: &SimParams) -> f64 {
    clip01(ccog(state) * (1.0 + params.omega_s * state.s))
}

/// Task performance score.
///
/// Capacity mapped through `perf_bias + perf_gain * cap`, minus penalties
/// for uncertainty and for arousal and narrative above their thresholds.
pub fn performance(state: &State, params: &SimParams) -> f64 {
    let penalty = params.w_u * state.u
        + params.w_a * (state.a - params.a_safe).max(0.0)
        + params.w_s * (state.s - params.s_safe).max(0.0);
    clip01(params.perf_bias + params.perf_gain * capacity(state, params) - penalty)
}
