//! Error types for the metrics engine.

use arc_types::{ParamError, TraceError};

/// Errors that make a trace unscorable.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// The trace has no steps.
    #[error("cannot score an empty trace")]
    EmptyTrace,

    /// The trace columns disagree in length.
    #[error("malformed trace: {source}")]
    Trace {
        /// The underlying structural error.
        #[from]
        source: TraceError,
    },

    /// A metric parameter is missing or invalid.
    #[error("metrics parameter error: {source}")]
    Param {
        /// The underlying parameter error.
        #[from]
        source: ParamError,
    },
}
