//! The ten-variable plant state.

use serde::{Deserialize, Serialize};

use crate::bounds::clip01;

/// Plant state of the regulated agent.
///
/// Every field lives in `[0, 1]`. The struct has no mutation methods:
/// the dynamics engine consumes one value and produces the next.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Integration.
    pub phi: f64,
    /// Global-workspace gain.
    pub g: f64,
    /// Predictive precision.
    pub p: f64,
    /// Attentional investment.
    pub i: f64,
    /// Narrative (rumination) intensity.
    pub s: f64,
    /// Valence.
    pub v: f64,
    /// Arousal.
    pub a: f64,
    /// Fast memory trace.
    pub mf: f64,
    /// Slow, consolidated memory trace.
    pub ms: f64,
    /// Effective uncertainty.
    pub u: f64,
}

impl State {
    /// Field names in trace column order.
    pub const FIELDS: [&'static str; 10] = ["phi", "g", "p", "i", "s", "v", "a", "mf", "ms", "u"];

    /// Return the field values in [`State::FIELDS`] order.
    pub const fn to_array(&self) -> [f64; 10] {
        [
            self.phi, self.g, self.p, self.i, self.s, self.v, self.a, self.mf, self.ms, self.u,
        ]
    }

    /// Return a copy with every field clipped to `[0, 1]`.
    ///
    /// Used when a state is built from external input; values produced by
    /// the dynamics engine are already in range.
    #[must_use]
    pub fn clipped(&self) -> Self {
        Self {
            phi: clip01(self.phi),
            g: clip01(self.g),
            p: clip01(self.p),
            i: clip01(self.i),
            s: clip01(self.s),
            v: clip01(self.v),
            a: clip01(self.a),
            mf: clip01(self.mf),
            ms: clip01(self.ms),
            u: clip01(self.u),
        }
    }

    /// Whether every field is inside `[0, 1]`.
    pub fn is_bounded(&self) -> bool {
        self.to_array().iter().all(|x| (0.0..=1.0).contains(x))
    }
}
