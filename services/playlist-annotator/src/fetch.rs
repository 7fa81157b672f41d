//! Paginated listings through the credential rotor
//!
//! Each page request captures the cursor it was issued with, so a rotation in
//! the middle of a listing re-requests the same page under the next
//! credential instead of skipping or repeating one.

use std::future::Future;

use credential_rotor::{Connector, Invoker, Result};
use tracing::debug;
use youtube_api::{Page, Playlist, PlaylistApi, PlaylistItem};

/// Follow `nextPageToken` from an empty cursor until the last page,
/// accumulating items in server order.
pub async fn collect_pages<C, T, F, Fut>(
    invoker: &mut Invoker<C>,
    mut request: F,
) -> Result<Vec<T>>
where
    C: Connector,
    F: FnMut(C::Handle, Option<String>) -> Fut,
    Fut: Future<Output = youtube_api::Result<Page<T>>>,
{
    let mut collected = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = invoker
            .invoke(|handle| request(handle, cursor.clone()))
            .await?;
        debug!(
            received = page.items.len(),
            total = collected.len() + page.items.len(),
            "page received"
        );
        collected.extend(page.items);

        match page.next_page_token {
            Some(next) => cursor = Some(next),
            None => return Ok(collected),
        }
    }
}

/// All playlists owned by the authorized user.
pub async fn fetch_playlists<C>(invoker: &mut Invoker<C>) -> Result<Vec<Playlist>>
where
    C: Connector,
    C::Handle: PlaylistApi,
{
    collect_pages(invoker, |client, cursor| async move {
        client.list_playlists(cursor.as_deref()).await
    })
    .await
}

/// All items of one playlist.
pub async fn fetch_playlist_items<C>(
    invoker: &mut Invoker<C>,
    playlist_id: &str,
) -> Result<Vec<PlaylistItem>>
where
    C: Connector,
    C::Handle: PlaylistApi,
{
    collect_pages(invoker, |client, cursor| async move {
        client
            .list_playlist_items(playlist_id, cursor.as_deref())
            .await
    })
    .await
}
