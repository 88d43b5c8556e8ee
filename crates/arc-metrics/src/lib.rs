//! Metrics engine for the ARC regulation simulation.
//!
//! Turns a completed [`Trace`](arc_types::Trace) and its scenario onset
//! into a [`RunMetrics`] record: recovery after the shock, arousal
//! overshoot, rumination and narrative dominance, control effort,
//! performance statistics, and the continual-learning measures (retention,
//! adaptation speed, memory stability).
//!
//! # Modules
//!
//! - [`params`] -- [`MetricsParams`], the typed view of the metric keys.
//! - [`measures`] -- One pure function per metric over trace columns.
//! - [`report`] -- [`RunMetrics`] and [`compute_metrics`].
//! - [`error`] -- [`MetricsError`].

pub mod error;
pub mod measures;
pub mod params;
pub mod report;

pub use error::MetricsError;
pub use params::MetricsParams;
pub use report::{RunMetrics, compute_metrics};
