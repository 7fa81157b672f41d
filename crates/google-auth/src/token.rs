//! OAuth token exchange and refresh
//!
//! Both operations POST form-encoded requests to the client's `token_uri`
//! with different grant types.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::secrets::ClientSecrets;

/// Response from the token endpoint for both exchange and refresh.
///
/// `expires_in` is a delta in seconds. Refresh responses usually omit
/// `refresh_token`; the caller keeps the one it already has.
#[derive(Debug, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

fn default_expires_in() -> u64 {
    3600
}

/// Error body returned by Google's token endpoint.
#[derive(Debug, Deserialize)]
struct TokenErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Exchange an authorization code for tokens (end of the consent flow).
pub async fn exchange_code(
    client: &reqwest::Client,
    secrets: &ClientSecrets,
    code: &str,
    verifier: &str,
    redirect_uri: &str,
) -> Result<TokenResponse> {
    let mut form = vec![
        ("grant_type", "authorization_code"),
        ("code", code),
        ("code_verifier", verifier),
        ("client_id", secrets.client_id.as_str()),
        ("redirect_uri", redirect_uri),
    ];
    if let Some(secret) = &secrets.client_secret {
        form.push(("client_secret", secret.expose().as_str()));
    }

    let response = client
        .post(&secrets.token_uri)
        .form(&form)
        .send()
        .await
        .map_err(|e| Error::Http(format!("token exchange request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));
        return Err(Error::TokenExchange(format!(
            "token endpoint returned {status}: {}",
            describe(&body)
        )));
    }

    response
        .json::<TokenResponse>()
        .await
        .map_err(|e| Error::TokenExchange(format!("invalid token response: {e}")))
}

/// Obtain a new access token from a refresh token.
///
/// A rejected refresh token (revoked, expired, client deleted) is reported as
/// `InvalidCredentials` so the caller can fall back to interactive consent.
pub async fn refresh_token(
    client: &reqwest::Client,
    secrets: &ClientSecrets,
    refresh: &str,
) -> Result<TokenResponse> {
    let mut form = vec![
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh),
        ("client_id", secrets.client_id.as_str()),
    ];
    if let Some(secret) = &secrets.client_secret {
        form.push(("client_secret", secret.expose().as_str()));
    }

    let response = client
        .post(&secrets.token_uri)
        .form(&form)
        .send()
        .await
        .map_err(|e| Error::Http(format!("token refresh request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("<no body>"));

        if matches!(status.as_u16(), 400 | 401 | 403) {
            return Err(Error::InvalidCredentials(format!(
                "refresh token rejected ({status}): {}",
                describe(&body)
            )));
        }

        return Err(Error::TokenExchange(format!(
            "token refresh returned {status}: {}",
            describe(&body)
        )));
    }

    response
        .json::<TokenResponse>()
        .await
        .map_err(|e| Error::TokenExchange(format!("invalid refresh response: {e}")))
}

/// Render a token endpoint error body for messages, preferring the
/// structured `error`/`error_description` pair.
fn describe(body: &str) -> String {
    match serde_json::from_str::<TokenErrorBody>(body) {
        Ok(TokenErrorBody {
            error,
            error_description: Some(description),
        }) => format!("{error}: {description}"),
        Ok(TokenErrorBody { error, .. }) => error,
        Err(_) => body.trim().to_string(),
    }
}
