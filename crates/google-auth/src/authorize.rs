//! Token acquisition for one credential set
//!
//! Order of preference: fresh cached token, refreshed cached token, then a new
//! interactive consent. Whatever is obtained over the network is persisted.

use std::time::Duration;

use common::Secret;
use tracing::{debug, info, warn};

use crate::cache::{StoredToken, TokenCache};
use crate::consent::request_consent;
use crate::constants::{DEFAULT_USER, YOUTUBE_SCOPE};
use crate::error::{Error, Result};
use crate::secrets::ClientSecrets;
use crate::token::refresh_token;

/// Bearer token ready to be attached to API requests.
pub type AccessToken = Secret<String>;

#[derive(Debug, Clone)]
pub struct AuthorizeOptions {
    /// Cache key, one per end user of a credential set.
    pub user: String,
    pub scope: String,
    /// How long to wait for the browser redirect during consent.
    pub consent_timeout: Duration,
}

impl Default for AuthorizeOptions {
    fn default() -> Self {
        Self {
            user: DEFAULT_USER.to_string(),
            scope: YOUTUBE_SCOPE.to_string(),
            consent_timeout: Duration::from_secs(300),
        }
    }
}

/// Obtain an access token for `secrets`, consulting and updating `cache`.
pub async fn authorize(
    http: &reqwest::Client,
    secrets: &ClientSecrets,
    cache: &TokenCache,
    options: &AuthorizeOptions,
) -> Result<AccessToken> {
    let user = options.user.as_str();

    if let Some(stored) = cache.get(user).await {
        if stored.is_fresh(now_millis()) {
            debug!(user, "reusing cached access token");
            return Ok(Secret::new(stored.access_token));
        }

        if let Some(refresh) = stored.refresh_token {
            match refresh_token(http, secrets, &refresh).await {
                Ok(response) => {
                    let token = StoredToken::from_response(response, now_millis(), Some(refresh));
                    let access = token.access_token.clone();
                    cache.put(user, token).await?;
                    info!(user, "access token refreshed");
                    return Ok(Secret::new(access));
                }
                Err(Error::InvalidCredentials(reason)) => {
                    warn!(user, %reason, "cached refresh token rejected, consent required");
                    cache.remove(user).await?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    let response = request_consent(http, secrets, &options.scope, options.consent_timeout).await?;
    let token = StoredToken::from_response(response, now_millis(), None);
    let access = token.access_token.clone();
    cache.put(user, token).await?;
    info!(user, "authorization granted");
    Ok(Secret::new(access))
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Expiration far in the future (year 2100).
    const FUTURE_EXPIRY: u64 = 4_102_444_800_000;

    fn secrets(token_uri: String) -> ClientSecrets {
        let mut secrets =
            ClientSecrets::from_json(r#"{"installed":{"client_id":"cid"}}"#).unwrap();
        secrets.token_uri = token_uri;
        secrets
    }

    fn options() -> AuthorizeOptions {
        AuthorizeOptions {
            consent_timeout: Duration::from_millis(50),
            ..AuthorizeOptions::default()
        }
    }

    async fn cache_with(dir: &tempfile::TempDir, expires_at_ms: u64) -> TokenCache {
        let cache = TokenCache::load(dir.path().join("tokens.json")).await.unwrap();
        cache
            .put(
                DEFAULT_USER,
                StoredToken {
                    access_token: "at_cached".into(),
                    refresh_token: Some("rt_cached".into()),
                    expires_at_ms,
                    scope: None,
                },
            )
            .await
            .unwrap();
        cache
    }

    #[tokio::test]
    async fn fresh_cached_token_skips_network() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_with(&dir, FUTURE_EXPIRY).await;
        // Unroutable token endpoint: any network use would fail the test.
        let secrets = secrets("http://127.0.0.1:1/token".into());

        let token = authorize(&reqwest::Client::new(), &secrets, &cache, &options())
            .await
            .unwrap();
        assert_eq!(token.expose(), "at_cached");
    }

    #[tokio::test]
    async fn expired_token_is_refreshed_and_persisted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("refresh_token=rt_cached"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "at_refreshed",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let cache = cache_with(&dir, 1_000).await;
        let secrets = secrets(format!("{}/token", server.uri()));

        let token = authorize(&reqwest::Client::new(), &secrets, &cache, &options())
            .await
            .unwrap();
        assert_eq!(token.expose(), "at_refreshed");

        let reopened = TokenCache::load(dir.path().join("tokens.json")).await.unwrap();
        let stored = reopened.get(DEFAULT_USER).await.unwrap();
        assert_eq!(stored.access_token, "at_refreshed");
        assert_eq!(stored.refresh_token.as_deref(), Some("rt_cached"));
    }

    #[tokio::test]
    async fn rejected_refresh_falls_back_to_consent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"error": "invalid_grant"})),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let cache = cache_with(&dir, 1_000).await;
        let secrets = secrets(format!("{}/token", server.uri()));

        // Nobody completes the browser flow, so consent times out.
        let err = authorize(&reqwest::Client::new(), &secrets, &cache, &options())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConsentTimeout(_)), "got {err:?}");
        assert!(cache.get(DEFAULT_USER).await.is_none());
    }

    #[tokio::test]
    async fn refresh_transport_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let cache = cache_with(&dir, 1_000).await;
        let secrets = secrets("http://127.0.0.1:1/token".into());

        let err = authorize(&reqwest::Client::new(), &secrets, &cache, &options())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Http(_)), "got {err:?}");
        assert!(cache.get(DEFAULT_USER).await.is_some());
    }
}
