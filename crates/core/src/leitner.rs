use chrono::{DateTime, Duration, Utc};

use crate::model::{CardId, CardProgress, LeitnerBox};

//
// ─── INTERVALS ─────────────────────────────────────────────────────────────────
//

/// Days until the next review, indexed by box level.
pub const REVIEW_INTERVAL_DAYS: [i64; 6] = [0, 1, 3, 7, 14, 30];

/// Time to wait after a review that landed the card in `leitner_box`.
///
/// # Examples
///
/// ```
/// # use shuken_core::leitner::review_interval;
/// # use shuken_core::model::LeitnerBox;
/// assert_eq!(review_interval(LeitnerBox::FIRST), chrono::Duration::days(1));
/// assert_eq!(review_interval(LeitnerBox::MASTERED), chrono::Duration::days(30));
/// ```
#[must_use]
pub fn review_interval(leitner_box: LeitnerBox) -> Duration {
    Duration::days(REVIEW_INTERVAL_DAYS[usize::from(leitner_box.level())])
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Fresh record for a card that has never been reviewed. It is due immediately.
#[must_use]
pub fn create_progress(card_id: CardId, now: DateTime<Utc>) -> CardProgress {
    CardProgress {
        card_id,
        leitner_box: LeitnerBox::NEW,
        last_reviewed: None,
        next_review: now,
        correct_streak: 0,
        total_reviews: 0,
        correct_reviews: 0,
    }
}

/// Apply one answer and return the replacement record.
///
/// A correct answer moves the card up one box (capped at box 5). Any miss
/// sends it back to box 1, whatever box it was in. The next review is then
/// scheduled `review_interval(box)` after `now`.
///
/// # Examples
///
/// ```
/// # use shuken_core::leitner::{create_progress, record_answer};
/// # use shuken_core::model::{CardId, LeitnerBox};
/// # use shuken_core::time::fixed_now;
/// let now = fixed_now();
/// let fresh = create_progress(CardId::new(1), now);
///
/// let after = record_answer(&fresh, true, now);
/// assert_eq!(after.leitner_box(), LeitnerBox::FIRST);
/// assert_eq!(after.next_review(), now + chrono::Duration::days(1));
///
/// // the input is untouched
/// assert_eq!(fresh.total_reviews(), 0);
/// ```
#[must_use]
pub fn record_answer(progress: &CardProgress, is_correct: bool, now: DateTime<Utc>) -> CardProgress {
    let mut next = progress.clone();
    next.last_reviewed = Some(now);
    next.total_reviews = next.total_reviews.saturating_add(1);

    if is_correct {
        next.correct_reviews = next.correct_reviews.saturating_add(1);
        next.correct_streak = next.correct_streak.saturating_add(1);
        next.leitner_box = next.leitner_box.promoted();
    } else {
        next.correct_streak = 0;
        next.leitner_box = LeitnerBox::FIRST;
    }

    next.next_review = now + review_interval(next.leitner_box);
    next
}

/// Records whose next review is at or before `now`, in input order.
pub fn due_cards<'a>(
    progress: impl IntoIterator<Item = &'a CardProgress>,
    now: DateTime<Utc>,
) -> Vec<&'a CardProgress> {
    progress.into_iter().filter(|p| p.is_due(now)).collect()
}

//
// ─── STATISTICS ────────────────────────────────────────────────────────────────
//

/// Aggregate numbers for a deck's progress records.
///
/// `accuracy` and `progress` are whole percentages rounded half away from
/// zero (`f64::round`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeckStats {
    pub total: usize,
    pub reviewed: usize,
    pub mastered: usize,
    pub due_for_review: usize,
    pub accuracy: u8,
    pub progress: u8,
}

/// Summarize a set of progress records.
///
/// Every record passed in is counted; callers that want orphans excluded
/// should pass `ProgressSet::for_cards` instead of the raw set.
#[must_use]
pub fn deck_stats<'a>(
    progress: impl IntoIterator<Item = &'a CardProgress>,
    now: DateTime<Utc>,
) -> DeckStats {
    let mut stats = DeckStats::default();
    let mut accuracy_sum = 0.0_f64;

    for p in progress {
        stats.total += 1;
        if p.is_due(now) {
            stats.due_for_review += 1;
        }
        if p.leitner_box().is_mastered() {
            stats.mastered += 1;
        }
        if let Some(accuracy) = p.accuracy() {
            stats.reviewed += 1;
            accuracy_sum += accuracy;
        }
    }

    stats.accuracy = percentage(accuracy_sum, stats.reviewed.max(1));
    stats.progress = if stats.total == 0 {
        0
    } else {
        ratio_percentage(stats.reviewed, stats.total)
    };
    stats
}

/// `numerator / denominator` as a rounded whole percentage in `0..=100`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn percentage(numerator: f64, denominator: usize) -> u8 {
    let value = (numerator / denominator as f64 * 100.0).round();
    value.clamp(0.0, 100.0) as u8
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn ratio_percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    percentage(part as f64, whole)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
