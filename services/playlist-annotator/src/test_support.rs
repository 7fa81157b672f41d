//! In-memory YouTube stand-in for the pagination and annotation tests
//!
//! Every credential set connects to the same shared state. Calls are logged
//! with the credential that issued them, and individual calls can be scripted
//! to fail with a quota error or another API error.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};

use credential_rotor::{ConnectFuture, Connector, CredentialSet, Invoker, Rotor};
use youtube_api::{
    ApiError, ApiFuture, Page, Playlist, PlaylistApi, PlaylistItem, PlaylistItemContentDetails,
    PlaylistItemSnippet, PlaylistSnippet, ResourceId,
};

/// One remote call as observed by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub credential: String,
    pub operation: &'static str,
    /// Page cursor for listings, item id for updates.
    pub argument: Option<String>,
}

#[derive(Default)]
pub struct FakeState {
    pub playlists: Vec<Vec<Playlist>>,
    pub items: HashMap<String, Vec<Vec<PlaylistItem>>>,
    pub calls: Vec<Call>,
    pub updates: Vec<PlaylistItem>,
    /// Zero-based call numbers answered with a quota error.
    pub quota_on_calls: HashSet<usize>,
    /// Item ids whose update fails with a non-quota error.
    pub failing_updates: HashSet<String>,
}

impl FakeState {
    fn record(
        &mut self,
        credential: &str,
        operation: &'static str,
        argument: Option<String>,
    ) -> usize {
        self.calls.push(Call {
            credential: credential.to_string(),
            operation,
            argument,
        });
        self.calls.len() - 1
    }

    fn quota_check(&self, call: usize) -> youtube_api::Result<()> {
        if self.quota_on_calls.contains(&call) {
            return Err(
                ApiError::new(403, "youtube.quota", "quotaExceeded", "quota exceeded").into(),
            );
        }
        Ok(())
    }
}

fn page_of<T: Clone>(pages: &[Vec<T>], prefix: &str, token: Option<&str>) -> Page<T> {
    let index = token
        .and_then(|t| t.strip_prefix(prefix))
        .and_then(|n| n.parse::<usize>().ok())
        .unwrap_or(0);
    let items = pages.get(index).cloned().unwrap_or_default();
    let next_page_token = (index + 1 < pages.len()).then(|| format!("{prefix}{}", index + 1));
    Page {
        items,
        next_page_token,
    }
}

#[derive(Clone)]
pub struct FakeClient {
    credential: String,
    state: Arc<Mutex<FakeState>>,
}

impl PlaylistApi for FakeClient {
    fn list_playlists<'a>(&'a self, page_token: Option<&'a str>) -> ApiFuture<'a, Page<Playlist>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            let call = state.record(
                &self.credential,
                "list_playlists",
                page_token.map(String::from),
            );
            state.quota_check(call)?;
            Ok(page_of(&state.playlists, "playlists-", page_token))
        })
    }

    fn list_playlist_items<'a>(
        &'a self,
        playlist_id: &'a str,
        page_token: Option<&'a str>,
    ) -> ApiFuture<'a, Page<PlaylistItem>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            let call = state.record(
                &self.credential,
                "list_playlist_items",
                page_token.map(String::from),
            );
            state.quota_check(call)?;
            match state.items.get(playlist_id) {
                Some(pages) => Ok(page_of(pages, &format!("{playlist_id}-"), page_token)),
                None => Err(youtube_api::Error::Api(ApiError::new(
                    404,
                    "youtube.playlistItem",
                    "playlistNotFound",
                    "not found",
                ))),
            }
        })
    }

    fn update_playlist_item<'a>(&'a self, item: &'a PlaylistItem) -> ApiFuture<'a, PlaylistItem> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            let call = state.record(
                &self.credential,
                "update_playlist_item",
                Some(item.id.clone()),
            );
            state.quota_check(call)?;
            if state.failing_updates.contains(&item.id) {
                return Err(youtube_api::Error::Api(ApiError::new(
                    400,
                    "youtube.playlistItem",
                    "invalidResourceId",
                    "bad item",
                )));
            }
            state.updates.push(item.clone());
            Ok(item.clone())
        })
    }
}

pub struct FakeConnector {
    state: Arc<Mutex<FakeState>>,
}

impl Connector for FakeConnector {
    type Handle = FakeClient;

    fn connect<'a>(&'a self, credential: &'a CredentialSet) -> ConnectFuture<'a, FakeClient> {
        Box::pin(async move {
            Ok(FakeClient {
                credential: credential.name().to_string(),
                state: self.state.clone(),
            })
        })
    }
}

/// Invoker over `count` credentials (`c0.json`, `c1.json`, ...) sharing `state`.
pub fn invoker(state: &Arc<Mutex<FakeState>>, count: usize) -> Invoker<FakeConnector> {
    let credentials = (0..count)
        .map(|i| CredentialSet::new(format!("c{i}.json"), Path::new("/profile")))
        .collect();
    let connector = FakeConnector {
        state: state.clone(),
    };
    Invoker::new(Rotor::new(connector, credentials).unwrap())
}

pub fn playlist(id: &str, title: &str) -> Playlist {
    Playlist {
        id: id.to_string(),
        snippet: Some(PlaylistSnippet {
            title: title.to_string(),
            description: None,
        }),
    }
}

pub fn item(id: &str, playlist_id: &str, title: &str, note: Option<&str>) -> PlaylistItem {
    PlaylistItem {
        id: id.to_string(),
        snippet: Some(PlaylistItemSnippet {
            playlist_id: Some(playlist_id.to_string()),
            title: Some(title.to_string()),
            resource_id: Some(ResourceId {
                kind: "youtube#video".into(),
                video_id: Some(format!("video-{id}")),
            }),
            position: None,
        }),
        content_details: Some(PlaylistItemContentDetails {
            video_id: Some(format!("video-{id}")),
            note: note.map(String::from),
        }),
    }
}

/// Items `start..start + count` of `playlist_id`, without notes.
pub fn items(playlist_id: &str, start: usize, count: usize) -> Vec<PlaylistItem> {
    (start..start + count)
        .map(|n| item(&format!("item-{n}"), playlist_id, &format!("Video {n}"), None))
        .collect()
}
