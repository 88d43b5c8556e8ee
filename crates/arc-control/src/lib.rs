//! Regulation controllers for the ARC simulation.
//!
//! Every controller implements [`Controller`]: it sees the state entering
//! a step plus that step's [`Observation`](arc_types::Observation) and
//! returns a bounded [`ControlAction`](arc_types::ControlAction). The
//! variants range from stateless baselines to multi-rate, self-tuning,
//! and predictive laws. All of them share the [`ArcGains`] risk signal.
//!
//! Controllers are addressed by stable short names through
//! [`ControllerKind`], which also builds fresh boxed instances.
//!
//! # Modules
//!
//! - [`controller`] -- The [`Controller`] trait and shared [`ArcGains`].
//! - [`baseline`] -- No-control, naive-calm, performance-optimized.
//! - [`proportional`] -- ARC v1 and its ablations.
//! - [`pid`] -- Three-channel PID with anti-windup.
//! - [`lqr`] -- Fixed-gain LQR and the LQI variant.
//! - [`hierarchical`] -- Multi-rate ARC v2.
//! - [`meta`] -- The meta gain loop and ARC v3.
//! - [`robust`] -- Disturbance-margin regulation.
//! - [`adaptive`] -- Self-tuning gains.
//! - [`mpc`] -- Receding-horizon correction.
//! - [`ultimate`] -- LQI blended with MPC under a meta loop.
//! - [`history`] -- Bounded trailing sample windows.
//! - [`registry`] -- [`ControllerKind`].
//! - [`error`] -- [`ControlError`].

pub mod adaptive;
pub mod baseline;
pub mod controller;
pub mod error;
pub mod hierarchical;
pub mod history;
pub mod lqr;
pub mod meta;
pub mod mpc;
pub mod pid;
pub mod proportional;
pub mod registry;
pub mod robust;
pub mod ultimate;

pub use controller::{ArcGains, Controller};
pub use error::ControlError;
pub use registry::ControllerKind;
