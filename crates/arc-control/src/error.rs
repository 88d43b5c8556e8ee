//! Error types for controller lookup.

/// Errors that can occur while resolving a controller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    /// No controller is registered under the requested name.
    #[error("unknown controller `{name}`")]
    UnknownController {
        /// The requested name.
        name: String,
    },
}
