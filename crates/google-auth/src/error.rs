//! Error types for Google OAuth operations

/// Errors from authorization. All of them are fatal for the credential being
/// materialized; none of them indicate quota exhaustion.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("invalid client secrets: {0}")]
    InvalidClientSecrets(String),

    #[error("user denied consent: {0}")]
    ConsentDenied(String),

    #[error("no authorization callback received within {0}s")]
    ConsentTimeout(u64),

    #[error("authorization callback state mismatch")]
    StateMismatch,

    #[error("token cache parse error: {0}")]
    CacheParse(String),

    #[error("I/O error: {0}")]
    Io(String),
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;
