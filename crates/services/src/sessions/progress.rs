use shuken_core::leitner::DeckStats;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

/// Results shown once a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub correct: usize,
    pub incorrect: usize,
    pub total: usize,
    /// Rounded percentage of correct answers; 0 when nothing was answered.
    pub accuracy: u8,
}

impl SessionSummary {
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn from_counts(correct: usize, incorrect: usize) -> Self {
        let total = correct + incorrect;
        let accuracy = if total == 0 {
            0
        } else {
            (correct as f64 / total as f64 * 100.0).round() as u8
        };
        Self {
            correct,
            incorrect,
            total,
            accuracy,
        }
    }
}

/// Deck statistics restricted to the deck's current cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckOverview {
    pub stats: DeckStats,
    /// Progress entries whose card is gone from the deck.
    pub orphaned: usize,
}
