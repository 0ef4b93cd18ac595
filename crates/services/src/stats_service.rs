use std::sync::Arc;
use tracing::debug;

use shuken_core::leitner::deck_stats;
use shuken_core::model::DeckId;
use shuken_core::time::Clock;
use storage::{DeckRepository, ProgressRepository, StorageError};

use crate::sessions::DeckOverview;

/// Computes deck statistics against the deck's current card list.
///
/// Cards without a progress entry count as new and due; entries for removed
/// cards are reported as orphans but left out of every figure.
#[derive(Clone)]
pub struct DeckStatsService {
    clock: Clock,
    decks: Arc<dyn DeckRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl DeckStatsService {
    #[must_use]
    pub fn new(
        clock: Clock,
        decks: Arc<dyn DeckRepository>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            clock,
            decks,
            progress,
        }
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the deck or its progress cannot be loaded.
    pub async fn overview(&self, deck_id: DeckId) -> Result<DeckOverview, StorageError> {
        let deck = self.decks.get_deck(deck_id).await?;
        let progress = self.progress.load_progress(deck_id).await?;
        let now = self.clock.now();

        let joined = progress.for_cards(deck.cards(), now);
        let orphaned = progress.orphans(deck.cards()).len();
        if orphaned > 0 {
            debug!(deck = %deck_id, orphaned, "ignoring progress for removed cards");
        }

        Ok(DeckOverview {
            stats: deck_stats(&joined, now),
            orphaned,
        })
    }
}
