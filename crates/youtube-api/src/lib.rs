//! YouTube Data API boundary
//!
//! Defines the `PlaylistApi` trait that decouples the annotation logic from
//! the HTTP transport. `YouTubeClient` is the reqwest-backed implementation;
//! tests substitute scripted fakes. Only three remote operations are consumed:
//! listing the caller's playlists, listing a playlist's items, and a
//! field-masked update of a single playlist item.

pub mod client;
pub mod error;
pub mod model;

pub use client::{DEFAULT_BASE_URL, YouTubeClient};
pub use error::{ApiError, Error, ErrorEntry, Result};
pub use model::{
    Page, Playlist, PlaylistItem, PlaylistItemContentDetails, PlaylistItemSnippet,
    PlaylistSnippet, ResourceId,
};

use std::future::Future;
use std::pin::Pin;

/// Fixed page size for both listings (the API maximum).
pub const PAGE_SIZE: u32 = 50;

/// Parts requested when listing playlists.
pub const PLAYLIST_PARTS: &str = "id,snippet";

/// Parts requested when listing or updating playlist items.
pub const PLAYLIST_ITEM_PARTS: &str = "id,snippet,contentDetails";

/// Field mask for the note update. Everything outside the mask is left
/// untouched server-side.
pub const NOTE_UPDATE_FIELDS: &str = "id,snippet/playlistId,snippet/resourceId,contentDetails/note";

/// How a failed call should be treated by the credential rotor.
///
/// - QuotaExceeded: the active credential spent its quota, rotate and replay
/// - Other: anything else, propagated unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClassification {
    QuotaExceeded,
    Other,
}

/// Boxed future returned by `PlaylistApi` methods.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Remote operations available on an authorized connection.
///
/// Uses `Pin<Box<dyn Future>>` return types so fakes and the HTTP client
/// share one dyn-compatible surface.
pub trait PlaylistApi: Send + Sync {
    /// One page of playlists owned by the authorized user.
    fn list_playlists<'a>(&'a self, page_token: Option<&'a str>) -> ApiFuture<'a, Page<Playlist>>;

    /// One page of items of `playlist_id`.
    fn list_playlist_items<'a>(
        &'a self,
        playlist_id: &'a str,
        page_token: Option<&'a str>,
    ) -> ApiFuture<'a, Page<PlaylistItem>>;

    /// Submit a partial update restricted to `NOTE_UPDATE_FIELDS`.
    fn update_playlist_item<'a>(&'a self, item: &'a PlaylistItem) -> ApiFuture<'a, PlaylistItem>;
}
