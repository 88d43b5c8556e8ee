//! Shared type definitions for the ARC regulation simulation.
//!
//! Every crate in the workspace exchanges data through the types defined
//! here. The crate contains no dynamics and no control logic; it only
//! fixes the shapes of the values that cross crate boundaries.
//!
//! # Modules
//!
//! - [`bounds`] -- Saturating clip helpers used by every update rule.
//! - [`state`] -- The ten-variable plant [`State`].
//! - [`signal`] -- [`ControlAction`], [`Observation`], and [`Disturbance`].
//! - [`params`] -- The flat [`ParamMap`] configuration mapping.
//! - [`trace`] -- The columnar per-run [`Trace`].

pub mod bounds;
pub mod params;
pub mod signal;
pub mod state;
pub mod trace;

pub use bounds::{clip, clip01, clip_reward};
pub use params::{ParamError, ParamMap};
pub use signal::{ControlAction, Disturbance, Observation};
pub use state::State;
pub use trace::{Trace, TraceError, TraceRow};
