//! Error types for scenario construction and lookup.

use arc_types::ParamError;

/// Errors that can occur while building or looking up scenarios.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// A scenario parameter is missing or invalid.
    #[error("scenario parameter error: {source}")]
    Param {
        /// The underlying parameter error.
        #[from]
        source: ParamError,
    },

    /// No scenario with the requested name exists.
    #[error("unknown scenario `{name}`")]
    Unknown {
        /// The requested name.
        name: String,
    },
}
