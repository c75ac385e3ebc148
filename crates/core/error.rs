//! Error type shared by the whole crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolycountError {
    /// Malformed caller input outside the per-element recovery path.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The spatial index could not be allocated. Fatal for the run.
    #[error("Failed to build spatial index: {0}")]
    IndexBuildFailure(String),

    #[error("Serialization error: {0}")]
    SerializationErrorWithContext(String),
}

pub type Result<T> = std::result::Result<T, PolycountError>;
