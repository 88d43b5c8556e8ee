//! Stateless reference policies.

use arc_types::{ControlAction, Observation, ParamMap, State};

use crate::controller::{ArcGains, Controller};

/// Applies no regulation: every channel idle, memory ungated.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoControl;

impl Controller for NoControl {
    fn name(&self) -> &'static str {
        "no_control"
    }

    fn act(&mut self, _state: &State, _obs: &Observation, _params: &ParamMap) -> ControlAction {
        ControlAction::NEUTRAL
    }
}

/// Calms arousal in proportion to its excess and does nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveCalm;

impl Controller for NaiveCalm {
    fn name(&self) -> &'static str {
        "naive_calm"
    }

    fn act(&mut self, state: &State, _obs: &Observation, params: &ParamMap) -> ControlAction {
        let gains = ArcGains::from_params(params);
        ControlAction {
            u_calm: (2.0 * gains.arousal_excess(state)).min(1.0),
            ..ControlAction::NEUTRAL
        }
    }
}

/// Attention level held by [`PerfOptimized`].
const PERF_ATTENTION: f64 = 0.9;

/// Holds attention high for throughput and never regulates.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerfOptimized;

impl Controller for PerfOptimized {
    fn name(&self) -> &'static str {
        "perf_optimized"
    }

    fn act(&mut self, _state: &State, _obs: &Observation, _params: &ParamMap) -> ControlAction {
        ControlAction {
            u_att: PERF_ATTENTION,
            ..ControlAction::NEUTRAL
        }
    }
}
