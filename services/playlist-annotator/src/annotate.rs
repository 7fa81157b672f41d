//! Selective note update for playlist items
//!
//! An item whose note is already set is left alone. Otherwise its title is
//! written into the note with a field-masked update that carries only the
//! item id, the linkage fields the update contract requires, and the note.

use credential_rotor::{Connector, Error, Invoker, Result};
use tracing::{error, info};
use youtube_api::{PlaylistApi, PlaylistItem, PlaylistItemContentDetails, PlaylistItemSnippet};

/// What happened to one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Note already present.
    Skipped,
    Updated,
    /// Dry run: an update would have been submitted.
    Pending,
    /// The update was rejected; logged and counted, the run continues.
    Failed,
}

/// Minimal update payload for `item`, or `None` if it already has a note.
pub fn annotation_update(item: &PlaylistItem) -> Option<PlaylistItem> {
    if item.note().is_some() {
        return None;
    }

    let snippet = item.snippet.as_ref();
    Some(PlaylistItem {
        id: item.id.clone(),
        snippet: Some(PlaylistItemSnippet {
            playlist_id: snippet.and_then(|s| s.playlist_id.clone()),
            resource_id: snippet.and_then(|s| s.resource_id.clone()),
            ..PlaylistItemSnippet::default()
        }),
        content_details: Some(PlaylistItemContentDetails {
            video_id: None,
            note: Some(item.title().to_string()),
        }),
    })
}

/// Annotate one item through the rotor.
///
/// API failures for this item are contained: they are logged with the item id
/// and reported as `Outcome::Failed`. Rotor exhaustion and authorization
/// failures still end the run.
pub async fn annotate_item<C>(
    invoker: &mut Invoker<C>,
    item: &PlaylistItem,
    dry_run: bool,
) -> Result<Outcome>
where
    C: Connector,
    C::Handle: PlaylistApi,
{
    let Some(payload) = annotation_update(item) else {
        return Ok(Outcome::Skipped);
    };

    if dry_run {
        info!(item_id = %item.id, note = item.title(), "would update note");
        return Ok(Outcome::Pending);
    }

    let payload = &payload;
    let result = invoker
        .invoke(|client| async move { client.update_playlist_item(payload).await })
        .await;

    match result {
        Ok(_) => Ok(Outcome::Updated),
        Err(Error::Api(e)) => {
            error!(item_id = %item.id, error = %e, "failed to update playlist item");
            Ok(Outcome::Failed)
        }
        Err(e) => Err(e),
    }
}
