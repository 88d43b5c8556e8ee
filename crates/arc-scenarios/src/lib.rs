//! Disturbance programs for the ARC regulation simulation.
//!
//! A scenario is a stateless description of how prediction error, reward,
//! and exogenous uncertainty evolve over a run. Randomness comes only from
//! the generator handed in by the caller, so a seeded run is reproducible.
//! Two scenarios are state-coupled: they read the agent's current arousal
//! and fall back to a neutral reading when no state is available.
//!
//! # Modules
//!
//! - [`error`] -- [`ScenarioError`].
//! - [`params`] -- [`ScenarioParams`], the typed view of the scenario keys.
//! - [`scenario`] -- [`Scenario`] and the [`ScenarioKind`] disturbance laws.
//! - [`catalog`] -- The named catalog built from one parameter set.

pub mod catalog;
pub mod error;
pub mod params;
pub mod scenario;

pub use catalog::{build_scenarios, find};
pub use error::ScenarioError;
pub use params::ScenarioParams;
pub use scenario::{Scenario, ScenarioKind};
