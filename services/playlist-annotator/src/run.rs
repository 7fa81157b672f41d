//! Top-level walk over every playlist and item

use std::fmt;

use credential_rotor::{Connector, Invoker, Result};
use tracing::info;
use youtube_api::PlaylistApi;

use crate::annotate::{Outcome, annotate_item};
use crate::fetch::{fetch_playlist_items, fetch_playlists};

const SEPARATOR: &str = "__________";

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Report pending updates without submitting them.
    pub dry_run: bool,
}

/// Counters for one complete run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub playlists: usize,
    pub items: usize,
    pub updated: usize,
    pub skipped: usize,
    /// Items whose update would be submitted (dry run only).
    pub pending: usize,
    pub failed: usize,
    /// Credential rotations caused by quota exhaustion.
    pub rotations: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Skipped => self.skipped += 1,
            Outcome::Updated => self.updated += 1,
            Outcome::Pending => self.pending += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} playlists, {} items: {} updated, {} already annotated, {} failed",
            self.playlists, self.items, self.updated, self.skipped, self.failed
        )?;
        if self.pending > 0 {
            write!(f, ", {} pending (dry run)", self.pending)?;
        }
        if self.rotations > 0 {
            write!(f, " ({} credential rotations)", self.rotations)?;
        }
        Ok(())
    }
}

/// List every playlist, then annotate its items one by one.
///
/// A listing failure ends the run. A failed item update is counted and the
/// walk moves on to the next item.
pub async fn run<C>(invoker: &mut Invoker<C>, options: RunOptions) -> Result<RunSummary>
where
    C: Connector,
    C::Handle: PlaylistApi,
{
    let mut summary = RunSummary::default();

    let playlists = fetch_playlists(invoker).await?;
    println!("Total playlists to process: {}", playlists.len());

    for playlist in &playlists {
        println!("Processing playlist: {}", playlist.title());
        let items = fetch_playlist_items(invoker, &playlist.id).await?;
        println!("Total items: {}", items.len());
        info!(playlist_id = %playlist.id, items = items.len(), "playlist listed");

        for item in &items {
            println!("Processing playlist item: {}", item.title());
            let outcome = annotate_item(invoker, item, options.dry_run).await?;
            summary.record(outcome);
        }

        summary.playlists += 1;
        summary.items += items.len();
        println!("{SEPARATOR}");
    }

    summary.rotations = invoker.rotations();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeState, invoker, item, items, playlist};
    use std::sync::{Arc, Mutex};

    fn library() -> Arc<Mutex<FakeState>> {
        let mut state = FakeState::default();
        state.playlists = vec![vec![playlist("PL1", "Music"), playlist("PL2", "Talks")]];
        state.items.insert(
            "PL1".into(),
            vec![vec![
                item("IT1", "PL1", "First", None),
                item("IT2", "PL1", "Second", Some("kept")),
                item("IT3", "PL1", "Third", Some("")),
            ]],
        );
        state
            .items
            .insert("PL2".into(), vec![items("PL2", 0, 50), items("PL2", 50, 2)]);
        Arc::new(Mutex::new(state))
    }

    #[tokio::test]
    async fn annotates_every_unannotated_item() {
        let state = library();
        let mut invoker = invoker(&state, 1);

        let summary = run(&mut invoker, RunOptions::default()).await.unwrap();

        assert_eq!(
            summary,
            RunSummary {
                playlists: 2,
                items: 55,
                updated: 54,
                skipped: 1,
                pending: 0,
                failed: 0,
                rotations: 0,
            }
        );
        let state = state.lock().unwrap();
        assert!(state.updates.iter().all(|u| u.id != "IT2"));
        let third = state.updates.iter().find(|u| u.id == "IT3").unwrap();
        assert_eq!(third.note(), Some("Third"));
    }

    #[tokio::test]
    async fn failed_item_does_not_stop_the_playlist() {
        let state = library();
        state
            .lock()
            .unwrap()
            .failing_updates
            .insert("IT1".into());
        let mut invoker = invoker(&state, 1);

        let summary = run(&mut invoker, RunOptions::default()).await.unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.updated, 53);
        let state = state.lock().unwrap();
        assert!(state.updates.iter().any(|u| u.id == "IT3"));
    }

    #[tokio::test]
    async fn quota_rotation_is_invisible_to_the_walk() {
        let state = library();
        // Call 0 lists playlists, call 1 lists PL1, call 2 updates IT1.
        state.lock().unwrap().quota_on_calls.insert(2);
        let mut invoker = invoker(&state, 2);

        let summary = run(&mut invoker, RunOptions::default()).await.unwrap();

        assert_eq!(summary.updated, 54);
        assert_eq!(summary.rotations, 1);
        let state = state.lock().unwrap();
        assert_eq!(state.calls[3].credential, "c1.json");
        assert_eq!(state.calls[3].argument.as_deref(), Some("IT1"));
        assert!(state.calls[3..].iter().all(|c| c.credential == "c1.json"));
    }

    #[tokio::test]
    async fn exhaustion_ends_the_run() {
        let state = library();
        state.lock().unwrap().quota_on_calls.insert(2);
        let mut invoker = invoker(&state, 1);

        let err = run(&mut invoker, RunOptions::default()).await.unwrap_err();
        assert!(matches!(
            err,
            credential_rotor::Error::Exhausted { configured: 1 }
        ));
        assert_eq!(state.lock().unwrap().calls.len(), 3);
    }

    #[tokio::test]
    async fn listing_failure_ends_the_run() {
        let state = library();
        state.lock().unwrap().playlists[0].push(playlist("PL3", "Gone"));
        let mut invoker = invoker(&state, 1);

        let err = run(&mut invoker, RunOptions::default()).await.unwrap_err();
        assert!(matches!(err, credential_rotor::Error::Api(_)));
    }

    #[tokio::test]
    async fn dry_run_only_lists() {
        let state = library();
        let mut invoker = invoker(&state, 1);

        let summary = run(&mut invoker, RunOptions { dry_run: true })
            .await
            .unwrap();

        assert_eq!(summary.pending, 54);
        assert_eq!(summary.updated, 0);
        let state = state.lock().unwrap();
        assert!(state.updates.is_empty());
        assert!(
            state
                .calls
                .iter()
                .all(|c| c.operation != "update_playlist_item")
        );
    }

    #[test]
    fn summary_display() {
        let summary = RunSummary {
            playlists: 2,
            items: 5,
            updated: 3,
            skipped: 1,
            pending: 0,
            failed: 1,
            rotations: 1,
        };
        assert_eq!(
            summary.to_string(),
            "Processed 2 playlists, 5 items: 3 updated, 1 already annotated, 1 failed (1 credential rotations)"
        );
    }
}
