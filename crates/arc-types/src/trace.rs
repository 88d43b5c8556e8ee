//! Columnar record of one simulation run.
//!
//! A [`Trace`] holds one entry per completed step for every column in
//! [`Trace::COLUMNS`]. The column names are the compatibility contract with
//! downstream exporters, so renaming a field is a breaking change.
//! State columns hold the post-step state; `control` holds the action that
//! produced it.

use serde::{Deserialize, Serialize};

use crate::signal::{ControlAction, Disturbance};
use crate::state::State;

/// Errors raised when a trace is structurally malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraceError {
    /// A column's length differs from the `t` column.
    #[error("trace column `{column}` has {found} entries, expected {expected}")]
    LengthMismatch {
        /// The offending column.
        column: &'static str,
        /// Length of the `t` column.
        expected: usize,
        /// Length of the offending column.
        found: usize,
    },
}

/// One step of a run, as appended to a [`Trace`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceRow {
    /// Step index.
    pub t: usize,
    /// Disturbance applied at this step.
    pub disturbance: Disturbance,
    /// State after the step.
    pub state: State,
    /// Cognitive capacity proxy of `state`.
    pub ccog: f64,
    /// Integrated capacity of `state`.
    pub cap: f64,
    /// Performance score of `state`.
    pub perf: f64,
    /// Action applied at this step.
    pub control: ControlAction,
}

/// Full history of one (scenario, controller, seed) run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Step index.
    pub t: Vec<usize>,
    /// Prediction error.
    pub pe: Vec<f64>,
    /// Reward.
    pub reward: Vec<f64>,
    /// Exogenous uncertainty.
    pub u_exog: Vec<f64>,
    /// Integration.
    pub phi: Vec<f64>,
    /// Global-workspace gain.
    pub g: Vec<f64>,
    /// Predictive precision.
    pub p: Vec<f64>,
    /// Attentional investment.
    pub i: Vec<f64>,
    /// Narrative intensity.
    pub s: Vec<f64>,
    /// Valence.
    pub v: Vec<f64>,
    /// Arousal.
    pub a: Vec<f64>,
    /// Fast memory trace.
    pub mf: Vec<f64>,
    /// Slow memory trace.
    pub ms: Vec<f64>,
    /// Effective uncertainty.
    pub u: Vec<f64>,
    /// Cognitive capacity proxy.
    pub ccog: Vec<f64>,
    /// Integrated capacity.
    pub cap: Vec<f64>,
    /// Performance score.
    pub perf: Vec<f64>,
    /// Control action per step.
    pub control: Vec<ControlAction>,
}

impl Trace {
    /// Column names in export order.
    pub const COLUMNS: [&'static str; 18] = [
        "t", "pe", "reward", "u_exog", "phi", "g", "p", "i", "s", "v", "a", "mf", "ms", "u",
        "ccog", "cap", "perf", "control",
    ];

    /// Create an empty trace with room for `horizon` steps.
    pub fn with_capacity(horizon: usize) -> Self {
        let col = || Vec::with_capacity(horizon);
        Self {
            t: Vec::with_capacity(horizon),
            pe: col(),
            reward: col(),
            u_exog: col(),
            phi: col(),
            g: col(),
            p: col(),
            i: col(),
            s: col(),
            v: col(),
            a: col(),
            mf: col(),
            ms: col(),
            u: col(),
            ccog: col(),
            cap: col(),
            perf: col(),
            control: Vec::with_capacity(horizon),
        }
    }

    /// Append one step to every column.
    pub fn push(&mut self, row: &TraceRow) {
        self.t.push(row.t);
        self.pe.push(row.disturbance.pe);
        self.reward.push(row.disturbance.reward);
        self.u_exog.push(row.disturbance.u_exog);
        self.phi.push(row.state.phi);
        self.g.push(row.state.g);
        self.p.push(row.state.p);
        self.i.push(row.state.i);
        self.s.push(row.state.s);
        self.v.push(row.state.v);
        self.a.push(row.state.a);
        self.mf.push(row.state.mf);
        self.ms.push(row.state.ms);
        self.u.push(row.state.u);
        self.ccog.push(row.ccog);
        self.cap.push(row.cap);
        self.perf.push(row.perf);
        self.control.push(row.control);
    }

    /// Number of recorded steps (length of the `t` column).
    pub fn len(&self) -> usize {
        self.t.len()
    }

    /// Whether no step has been recorded.
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Check that every column has the same length.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::LengthMismatch`] naming the first column whose
    /// length differs from the `t` column.
    pub fn validate(&self) -> Result<usize, TraceError> {
        let expected = self.t.len();
        let lengths = [
            ("pe", self.pe.len()),
            ("reward", self.reward.len()),
            ("u_exog", self.u_exog.len()),
            ("phi", self.phi.len()),
            ("g", self.g.len()),
            ("p", self.p.len()),
            ("i", self.i.len()),
            ("s", self.s.len()),
            ("v", self.v.len()),
            ("a", self.a.len()),
            ("mf", self.mf.len()),
            ("ms", self.ms.len()),
            ("u", self.u.len()),
            ("ccog", self.ccog.len()),
            ("cap", self.cap.len()),
            ("perf", self.perf.len()),
            ("control", self.control.len()),
        ];
        for (column, found) in lengths {
            if found != expected {
                return Err(TraceError::LengthMismatch {
                    column,
                    expected,
                    found,
                });
            }
        }
        Ok(expected)
    }
}
