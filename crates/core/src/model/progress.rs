use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::model::card::Card;
use crate::model::ids::CardId;

//
// ─── LEITNER BOX ───────────────────────────────────────────────────────────────
//

/// Mastery level of a card: 0 for never-reviewed cards, 1..=5 afterwards.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct LeitnerBox(u8);

impl LeitnerBox {
    pub const NEW: Self = Self(0);
    pub const FIRST: Self = Self(1);
    pub const MASTERED: Self = Self(5);

    /// Builds a box from any integer, clamping into `0..=5`.
    ///
    /// Persisted state can be corrupted or hand-edited, so reads never fail.
    #[must_use]
    pub fn clamped(raw: i64) -> Self {
        let max = i64::from(Self::MASTERED.0);
        // clamp guarantees the value fits in u8
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let level = raw.clamp(0, max) as u8;
        Self(level)
    }

    #[must_use]
    pub fn level(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn is_new(self) -> bool {
        self == Self::NEW
    }

    #[must_use]
    pub fn is_mastered(self) -> bool {
        self == Self::MASTERED
    }

    /// The next box up, saturating at box 5.
    #[must_use]
    pub fn promoted(self) -> Self {
        Self(self.0.saturating_add(1).min(Self::MASTERED.0))
    }
}

impl fmt::Debug for LeitnerBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LeitnerBox({})", self.0)
    }
}

impl fmt::Display for LeitnerBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── CARD PROGRESS ─────────────────────────────────────────────────────────────
//

/// Review state of one card.
///
/// Records are replaced wholesale: the engine returns a new value per answer
/// and never edits one in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardProgress {
    pub(crate) card_id: CardId,
    pub(crate) leitner_box: LeitnerBox,
    pub(crate) last_reviewed: Option<DateTime<Utc>>,
    pub(crate) next_review: DateTime<Utc>,
    pub(crate) correct_streak: u32,
    pub(crate) total_reviews: u32,
    pub(crate) correct_reviews: u32,
}

impl CardProgress {
    /// Rehydrate a record from storage, repairing out-of-range values.
    ///
    /// - `box` is clamped into `0..=5`.
    /// - `correct_reviews` is capped at `total_reviews`, and `correct_streak`
    ///   at `correct_reviews`.
    /// - `last_reviewed` is dropped when `total_reviews == 0`.
    #[must_use]
    pub fn from_persisted(
        card_id: CardId,
        raw_box: i64,
        last_reviewed: Option<DateTime<Utc>>,
        next_review: DateTime<Utc>,
        correct_streak: u32,
        total_reviews: u32,
        correct_reviews: u32,
    ) -> Self {
        let correct_reviews = correct_reviews.min(total_reviews);
        Self {
            card_id,
            leitner_box: LeitnerBox::clamped(raw_box),
            last_reviewed: if total_reviews == 0 {
                None
            } else {
                last_reviewed
            },
            next_review,
            correct_streak: correct_streak.min(correct_reviews),
            total_reviews,
            correct_reviews,
        }
    }

    #[must_use]
    pub fn card_id(&self) -> CardId {
        self.card_id
    }

    #[must_use]
    pub fn leitner_box(&self) -> LeitnerBox {
        self.leitner_box
    }

    #[must_use]
    pub fn last_reviewed(&self) -> Option<DateTime<Utc>> {
        self.last_reviewed
    }

    #[must_use]
    pub fn next_review(&self) -> DateTime<Utc> {
        self.next_review
    }

    #[must_use]
    pub fn correct_streak(&self) -> u32 {
        self.correct_streak
    }

    #[must_use]
    pub fn total_reviews(&self) -> u32 {
        self.total_reviews
    }

    #[must_use]
    pub fn correct_reviews(&self) -> u32 {
        self.correct_reviews
    }

    #[must_use]
    pub fn is_reviewed(&self) -> bool {
        self.total_reviews > 0
    }

    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }

    /// Share of correct answers in `0.0..=1.0`, or `None` if never reviewed.
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        if self.total_reviews == 0 {
            return None;
        }
        Some(f64::from(self.correct_reviews) / f64::from(self.total_reviews))
    }
}

//
// ─── PROGRESS SET ──────────────────────────────────────────────────────────────
//

/// All progress records of one deck, keyed by card id.
///
/// The set may be sparse (cards without an entry count as new) and may keep
/// entries for cards that were removed from the deck. Those orphans are kept
/// until the whole deck is deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSet {
    entries: BTreeMap<CardId, CardProgress>,
}

impl ProgressSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, card_id: CardId) -> Option<&CardProgress> {
        self.entries.get(&card_id)
    }

    #[must_use]
    pub fn contains(&self, card_id: CardId) -> bool {
        self.entries.contains_key(&card_id)
    }

    /// Stores `progress`, replacing any record for the same card.
    pub fn insert(&mut self, progress: CardProgress) -> Option<CardProgress> {
        self.entries.insert(progress.card_id, progress)
    }

    /// Returns the record for `card_id`, creating a fresh one if missing.
    pub fn ensure(&mut self, card_id: CardId, now: DateTime<Utc>) -> &CardProgress {
        self.entries
            .entry(card_id)
            .or_insert_with(|| crate::leitner::create_progress(card_id, now))
    }

    /// Creates records for every card that lacks one. Returns how many were created.
    pub fn ensure_cards<'a>(
        &mut self,
        cards: impl IntoIterator<Item = &'a Card>,
        now: DateTime<Utc>,
    ) -> usize {
        let before = self.entries.len();
        for card in cards {
            self.ensure(card.id(), now);
        }
        self.entries.len() - before
    }

    /// Records for the given cards in card order, with fresh records standing in
    /// for missing entries. Orphans are not included.
    #[must_use]
    pub fn for_cards(&self, cards: &[Card], now: DateTime<Utc>) -> Vec<CardProgress> {
        cards
            .iter()
            .map(|card| {
                self.entries
                    .get(&card.id())
                    .cloned()
                    .unwrap_or_else(|| crate::leitner::create_progress(card.id(), now))
            })
            .collect()
    }

    /// Ids of entries whose card is not in `cards`.
    #[must_use]
    pub fn orphans(&self, cards: &[Card]) -> Vec<CardId> {
        let live: HashSet<CardId> = cards.iter().map(Card::id).collect();
        self.entries
            .keys()
            .filter(|id| !live.contains(id))
            .copied()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardProgress> {
        self.entries.values()
    }
}

impl FromIterator<CardProgress> for ProgressSet {
    fn from_iter<I: IntoIterator<Item = CardProgress>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|p| (p.card_id, p)).collect(),
        }
    }
}

impl IntoIterator for ProgressSet {
    type Item = CardProgress;
    type IntoIter = std::collections::btree_map::IntoValues<CardId, CardProgress>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

impl<'a> IntoIterator for &'a ProgressSet {
    type Item = &'a CardProgress;
    type IntoIter = std::collections::btree_map::Values<'a, CardId, CardProgress>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
