//! Error types for rotation and rotated operations

/// Errors surfaced by the rotor and the invoker.
///
/// Only `Api` errors come from the remote operation itself, and only those
/// are ever inspected for quota exhaustion.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("authorization failed for {credential}: {reason}")]
    Authorization { credential: String, reason: String },

    #[error("no more API credentials left ({configured} configured)")]
    Exhausted { configured: usize },

    #[error("no credentials configured")]
    NoCredentials,

    #[error(transparent)]
    Api(#[from] youtube_api::Error),
}

/// Result alias for rotor operations.
pub type Result<T> = std::result::Result<T, Error>;
