use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;

use shuken_core::leitner::due_cards;
use shuken_core::model::{Card, CardId, ProgressSet};

use crate::settings::DEFAULT_MIN_SESSION_SIZE;

/// Selection result for a session build.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    /// Cards to study, already shuffled.
    pub cards: Vec<Card>,
    pub due_selected: usize,
    /// Non-due cards added to reach the minimum session size.
    pub padded_selected: usize,
}

impl SessionPlan {
    #[must_use]
    pub fn total(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Picks the cards of a study session.
///
/// Every due card is studied. When fewer than `min_session_size` cards are
/// due, random non-due cards fill the gap until the minimum is met or the
/// deck runs out. The final queue is shuffled.
pub struct SessionBuilder<'a> {
    cards: &'a [Card],
    min_session_size: usize,
}

impl<'a> SessionBuilder<'a> {
    #[must_use]
    pub fn new(cards: &'a [Card]) -> Self {
        Self {
            cards,
            min_session_size: DEFAULT_MIN_SESSION_SIZE,
        }
    }

    #[must_use]
    pub fn with_min_session_size(mut self, size: usize) -> Self {
        self.min_session_size = size;
        self
    }

    /// Build a plan against the deck's progress set.
    ///
    /// Cards without a progress entry get a fresh one in `progress` before
    /// anything else is decided, so they count as due. Entries for cards that
    /// are no longer in the deck are left alone and never selected.
    pub fn build<R: Rng + ?Sized>(
        self,
        progress: &mut ProgressSet,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> SessionPlan {
        progress.ensure_cards(self.cards, now);

        let due_ids: HashSet<CardId> = due_cards(progress.iter(), now)
            .into_iter()
            .map(|p| p.card_id())
            .collect();

        let (mut selected, mut rest): (Vec<Card>, Vec<Card>) = self
            .cards
            .iter()
            .cloned()
            .partition(|c| due_ids.contains(&c.id()));
        let due_selected = selected.len();

        let shortfall = self.min_session_size.saturating_sub(due_selected);
        let mut padded_selected = 0;
        if shortfall > 0 && !rest.is_empty() {
            rest.shuffle(rng);
            rest.truncate(shortfall);
            padded_selected = rest.len();
            selected.extend(rest);
        }

        selected.shuffle(rng);

        SessionPlan {
            cards: selected,
            due_selected,
            padded_selected,
        }
    }
}
