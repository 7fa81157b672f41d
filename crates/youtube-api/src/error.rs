//! Error types for YouTube Data API calls

use serde::Deserialize;

/// One entry of the structured error list returned by Google APIs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorEntry {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
}

/// Structured error payload (`{"error": {"code", "message", "errors": [...]}}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, thiserror::Error)]
#[error("API error {code}: {message}")]
pub struct ApiError {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ErrorEntry>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

impl ApiError {
    /// Build an error with a single entry, mostly useful for fakes.
    pub fn new(code: u16, domain: &str, reason: &str, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
            errors: vec![ErrorEntry {
                domain: domain.to_string(),
                reason: reason.to_string(),
                message: message.to_string(),
            }],
        }
    }

    /// Parse a non-success response body.
    ///
    /// Bodies that are not a structured Google error still produce an
    /// `ApiError` carrying the status code and the raw text, with no entries.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => {
                let mut error = envelope.error;
                if error.code == 0 {
                    error.code = status;
                }
                error
            }
            Err(_) => Self {
                code: status,
                message: body.trim().to_string(),
                errors: Vec::new(),
            },
        }
    }
}

/// Errors from remote API operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Result alias for API operations.
pub type Result<T> = std::result::Result<T, Error>;
