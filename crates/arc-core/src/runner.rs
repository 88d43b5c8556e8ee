//! Closed-loop episode runner.
//!
//! [`run_episode`] drives one (scenario, controller, seed) run: at every
//! step the scenario produces a disturbance, the controller observes the
//! pre-step state and acts, and the plant advances. The post-step state and
//! its derived quantities are appended to the trace, which is scored once
//! the horizon is reached.

use std::str::FromStr;

use arc_control::{ControlError, Controller, ControllerKind};
use arc_metrics::{MetricsError, MetricsParams, RunMetrics, compute_metrics};
use arc_scenarios::{Scenario, ScenarioError};
use arc_sim::{SimParams, capacity, ccog, performance, step};
use arc_types::{Observation, ParamError, ParamMap, Trace, TraceRow};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

/// Errors that can occur during a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A required parameter is missing or invalid.
    #[error("parameter error: {source}")]
    Param {
        /// The underlying parameter error.
        #[from]
        source: ParamError,
    },

    /// The scenario could not be resolved.
    #[error("scenario error: {source}")]
    Scenario {
        /// The underlying scenario error.
        #[from]
        source: ScenarioError,
    },

    /// The controller could not be resolved.
    #[error("controller error: {source}")]
    Control {
        /// The underlying controller error.
        #[from]
        source: ControlError,
    },

    /// The finished trace could not be scored.
    #[error("metrics error: {source}")]
    Metrics {
        /// The underlying metrics error.
        #[from]
        source: MetricsError,
    },
}

/// Result of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Per-step record of the run.
    pub trace: Trace,
    /// Scores computed from the trace.
    pub metrics: RunMetrics,
}

/// Run one closed-loop episode.
///
/// The controller is reset first, so an instance may be reused across
/// runs. All randomness comes from a generator seeded with `seed`; the
/// same inputs always produce the same trace.
///
/// # Errors
///
/// Returns [`RunnerError::Param`] before the first step if a simulation or
/// metrics parameter is missing, and [`RunnerError::Metrics`] if the trace
/// cannot be scored (a zero horizon).
pub fn run_episode(
    controller: &mut dyn Controller,
    scenario: &Scenario,
    seed: u64,
    params: &ParamMap,
) -> Result<RunOutcome, RunnerError> {
    let sim = SimParams::from_map(params)?;
    let metrics_params = MetricsParams::from_map(params)?;

    let span = debug_span!(
        "run",
        scenario = scenario.name(),
        controller = controller.name(),
        seed
    );
    let _guard = span.enter();

    controller.reset();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = sim.initial_state();
    let mut trace = Trace::with_capacity(scenario.horizon);

    for t in 0..scenario.horizon {
        // No state has been observed before the first step.
        let coupled = (t > 0).then_some(&state);
        let disturbance = scenario.generate(t, &mut rng, coupled);

        let obs = Observation {
            perf: performance(&state, &sim),
            ccog: ccog(&state),
            cap: capacity(&state, &sim),
            ..Observation::from_disturbance(&disturbance)
        };
        let action = controller.act(&state, &obs, params);
        state = step(&state, &disturbance, &action, &sim);

        trace.push(&TraceRow {
            t,
            disturbance,
            state,
            ccog: ccog(&state),
            cap: capacity(&state, &sim),
            perf: performance(&state, &sim),
            control: action,
        });
    }

    let metrics = compute_metrics(&trace, scenario.onset, &metrics_params)?;
    debug!(
        steps = trace.len(),
        perf_mean = metrics.perf_mean,
        rt = metrics.rt,
        ri = metrics.ri,
        effort = metrics.control_effort,
        "run complete"
    );
    Ok(RunOutcome { trace, metrics })
}

/// Run one episode with the scenario and controller addressed by name.
///
/// # Errors
///
/// Returns [`RunnerError::Control`] or [`RunnerError::Scenario`] for an
/// unknown name, or anything [`run_episode`] reports.
pub fn run_named(
    controller: &str,
    scenario: &str,
    seed: u64,
    params: &ParamMap,
) -> Result<RunOutcome, RunnerError> {
    let kind = ControllerKind::from_str(controller)?;
    let scenario = arc_scenarios::find(scenario, params)?;
    run_episode(kind.build().as_mut(), &scenario, seed, params)
}
