//! Typed view of the scenario keys.

use arc_types::{ParamError, ParamMap};

/// Constants shared by every disturbance program.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioParams {
    /// Number of steps in a run.
    pub horizon: usize,
    /// Onset step of the shock-style scenarios.
    pub shock_t: usize,
    /// Resting exogenous uncertainty.
    pub u_base: f64,
    /// Exogenous uncertainty during a shock.
    pub u_shock: f64,
    /// Resting prediction error.
    pub pe_base: f64,
    /// Amplitude of the uniform prediction-error noise.
    pub pe_noise: f64,
    /// Length of the `noise_burst` window.
    pub burst_len: usize,
}

impl ScenarioParams {
    /// Build the typed view, failing on the first missing key.
    pub fn from_map(params: &ParamMap) -> Result<Self, ParamError> {
        Ok(Self {
            horizon: params.require_count("horizon")?,
            shock_t: params.require_count("shock_t")?,
            u_base: params.require("u_base")?,
            u_shock: params.require("u_shock")?,
            pe_base: params.require("pe_base")?,
            pe_noise: params.require("pe_noise")?,
            burst_len: params.require_count("burst_len")?,
        })
    }
}
