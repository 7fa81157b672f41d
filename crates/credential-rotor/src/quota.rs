//! Quota detection for YouTube Data API errors
//!
//! Google reports an exhausted daily quota as a structured error whose entries
//! carry a reserved quota domain. That condition belongs to the credential, not
//! the request, so it is the only one that triggers rotation.

use youtube_api::{ApiError, Error, ErrorClassification};

/// Error domains that mark quota exhaustion, compared case-insensitively.
pub const QUOTA_DOMAINS: &[&str] = &["youtube.quota", "quota"];

/// Whether any entry of a structured API error is in a quota domain.
pub fn is_quota_exhausted(error: &ApiError) -> bool {
    error.errors.iter().any(|entry| {
        QUOTA_DOMAINS
            .iter()
            .any(|domain| entry.domain.eq_ignore_ascii_case(domain))
    })
}

/// Classify a failed remote call.
///
/// Transport and decode failures are never quota exhaustion, whatever their
/// text says.
pub fn classify(error: &Error) -> ErrorClassification {
    match error {
        Error::Api(api) if is_quota_exhausted(api) => ErrorClassification::QuotaExceeded,
        _ => ErrorClassification::Other,
    }
}
