//! Plant model for the ARC regulation simulation.
//!
//! The plant is a ten-variable state driven by exogenous disturbances and a
//! five-channel regulation command. This crate owns the typed parameter
//! view of the model, the pure one-step transition, and the derived
//! capacity and performance measures that controllers and metrics read.
//!
//! # Modules
//!
//! - [`params`] -- [`SimParams`], the typed view of the dynamics constants.
//! - [`derived`] -- Cognitive capacity, integrated capacity, performance.
//! - [`dynamics`] -- The one-step transition [`step`].

pub mod derived;
pub mod dynamics;
pub mod params;

pub use derived::{capacity, ccog, performance};
pub use dynamics::step;
pub use params::SimParams;
