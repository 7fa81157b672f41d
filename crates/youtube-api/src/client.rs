//! reqwest-backed implementation of `PlaylistApi`
//!
//! A `YouTubeClient` is bound to exactly one access token. Clones share the
//! underlying connection pool and token, so handing a clone to each retried
//! operation is cheap.

use std::sync::Arc;

use common::Secret;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ApiError, Error, Result};
use crate::model::{Page, Playlist, PlaylistItem};
use crate::{
    ApiFuture, NOTE_UPDATE_FIELDS, PAGE_SIZE, PLAYLIST_ITEM_PARTS, PLAYLIST_PARTS, PlaylistApi,
};

/// Production endpoint of the YouTube Data API v3.
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Authorized connection to the YouTube Data API.
#[derive(Clone)]
pub struct YouTubeClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    access_token: Arc<Secret<String>>,
}

impl std::fmt::Debug for YouTubeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeClient")
            .field("base_url", &self.base_url)
            .field("access_token", &self.access_token)
            .finish()
    }
}

impl YouTubeClient {
    pub fn new(http: reqwest::Client, base_url: &str, access_token: Secret<String>) -> Self {
        Self {
            http,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            access_token: Arc::new(access_token),
        }
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{resource}", self.base_url)
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, &str)],
        page_token: Option<&str>,
    ) -> Result<Page<T>> {
        let max_results = PAGE_SIZE.to_string();
        let mut request = self
            .http
            .get(self.url(resource))
            .bearer_auth(self.access_token.expose())
            .query(query)
            .query(&[("maxResults", max_results.as_str())]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }
        debug!(resource, page_token, "requesting page");
        read_response(request.send().await).await
    }
}

/// Turn a send result into a decoded body or a classified error.
async fn read_response<T: DeserializeOwned>(
    sent: std::result::Result<reqwest::Response, reqwest::Error>,
) -> Result<T> {
    let response = sent.map_err(|e| Error::Http(e.to_string()))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::Http(format!("reading response body: {e}")))?;

    if !status.is_success() {
        return Err(Error::Api(ApiError::from_response(status.as_u16(), &body)));
    }

    serde_json::from_str(&body).map_err(|e| Error::Decode(e.to_string()))
}

impl PlaylistApi for YouTubeClient {
    fn list_playlists<'a>(&'a self, page_token: Option<&'a str>) -> ApiFuture<'a, Page<Playlist>> {
        Box::pin(async move {
            self.get_page(
                "playlists",
                &[("part", PLAYLIST_PARTS), ("mine", "true")],
                page_token,
            )
            .await
        })
    }

    fn list_playlist_items<'a>(
        &'a self,
        playlist_id: &'a str,
        page_token: Option<&'a str>,
    ) -> ApiFuture<'a, Page<PlaylistItem>> {
        Box::pin(async move {
            self.get_page(
                "playlistItems",
                &[("part", PLAYLIST_ITEM_PARTS), ("playlistId", playlist_id)],
                page_token,
            )
            .await
        })
    }

    fn update_playlist_item<'a>(&'a self, item: &'a PlaylistItem) -> ApiFuture<'a, PlaylistItem> {
        Box::pin(async move {
            debug!(item_id = %item.id, "updating playlist item");
            let sent = self
                .http
                .put(self.url("playlistItems"))
                .bearer_auth(self.access_token.expose())
                .query(&[("part", PLAYLIST_ITEM_PARTS), ("fields", NOTE_UPDATE_FIELDS)])
                .json(item)
                .send()
                .await;
            read_response(sent).await
        })
    }
}
