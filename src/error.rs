// ABOUTME: Crate-wide error types for dockhand.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::types::{ContainerId, ParseImageRefError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The engine daemon could not be reached. Fatal to the handle.
    #[error("cannot reach container engine: {0}")]
    Connection(String),

    /// The image reference in the spec is malformed or empty.
    #[error("invalid image reference: {0}")]
    InvalidImage(#[from] ParseImageRefError),

    /// The image was absent locally and the registry pull failed.
    #[error("failed to pull image {image}: {reason}")]
    ImagePull { image: String, reason: String },

    /// A container with the requested name already exists.
    #[error("container {name} already exists ({existing_id})")]
    Conflict {
        name: String,
        existing_id: ContainerId,
    },

    /// A container port in the spec is not a valid port number.
    #[error("invalid container port: {0}")]
    InvalidPort(String),

    /// The engine rejected the create request.
    #[error("container create failed: {0}")]
    Create(String),

    /// The engine rejected the start request. The container exists but is
    /// not running; it is left in place for inspection or teardown.
    #[error("container start failed: {0}")]
    Start(String),

    /// No container matches the given identifier or name.
    #[error("container {0} not found")]
    NotFound(String),

    /// The engine handle's cancellation token fired mid-call.
    #[error("operation canceled")]
    Canceled,

    /// Unclassified engine response.
    #[error("engine error: {0}")]
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, Error>;
