//! Google OAuth connector: credential set to authorized YouTube client
//!
//! Glues the identity provider (`google_auth`) to the API client
//! (`youtube_api`) behind the rotor's `Connector` trait. Every failure here is
//! an authorization failure for the credential being materialized.

use credential_rotor::{ConnectFuture, Connector, CredentialSet};
use google_auth::{AuthorizeOptions, ClientSecrets, TOKEN_CACHE_FILE, TokenCache, authorize};
use tracing::info;
use youtube_api::YouTubeClient;

pub struct OAuthConnector {
    http: reqwest::Client,
    base_url: String,
    options: AuthorizeOptions,
}

impl OAuthConnector {
    pub fn new(http: reqwest::Client, base_url: String, options: AuthorizeOptions) -> Self {
        Self {
            http,
            base_url,
            options,
        }
    }
}

impl Connector for OAuthConnector {
    type Handle = YouTubeClient;

    fn connect<'a>(&'a self, credential: &'a CredentialSet) -> ConnectFuture<'a, YouTubeClient> {
        Box::pin(async move {
            let auth_error = |e: google_auth::Error| credential_rotor::Error::Authorization {
                credential: credential.name().to_string(),
                reason: e.to_string(),
            };

            let secrets = ClientSecrets::load(credential.source())
                .await
                .map_err(auth_error)?;
            let cache = TokenCache::load(credential.cache_dir().join(TOKEN_CACHE_FILE))
                .await
                .map_err(auth_error)?;
            let token = authorize(&self.http, &secrets, &cache, &self.options)
                .await
                .map_err(auth_error)?;

            info!(
                credential = credential.name(),
                token_cache = %cache.path().display(),
                "credential ready"
            );
            Ok(YouTubeClient::new(self.http.clone(), &self.base_url, token))
        })
    }
}
