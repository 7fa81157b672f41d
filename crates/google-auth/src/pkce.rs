//! PKCE (Proof Key for Code Exchange) per RFC 7636
//!
//! The verifier stays in memory for the duration of one consent flow and is
//! sent during token exchange; the S256 challenge goes into the authorization
//! URL so Google can tie the exchange to the party that started the flow.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngExt;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::secrets::ClientSecrets;

/// Generate a random code verifier.
///
/// 64 random bytes encode to 86 URL-safe characters, inside the 43-128
/// range RFC 7636 allows.
pub fn generate_verifier() -> String {
    let mut bytes = [0u8; 64];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate an opaque `state` value for CSRF protection.
pub fn generate_state() -> String {
    let mut bytes = [0u8; 24];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// `challenge = BASE64URL(SHA256(verifier))`
pub fn compute_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Build the authorization URL for the loopback consent flow.
///
/// `access_type=offline` with `prompt=consent` makes Google issue a refresh
/// token, which later runs use to skip the browser entirely.
pub fn build_authorization_url(
    secrets: &ClientSecrets,
    redirect_uri: &str,
    scope: &str,
    state: &str,
    challenge: &str,
) -> Result<url::Url> {
    url::Url::parse_with_params(
        &secrets.auth_uri,
        &[
            ("client_id", secrets.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", scope),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("code_challenge", challenge),
            ("code_challenge_method", "S256"),
            ("state", state),
        ],
    )
    .map_err(|e| Error::InvalidClientSecrets(format!("auth_uri is not a URL: {e}")))
}
