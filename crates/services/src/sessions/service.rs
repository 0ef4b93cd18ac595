use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;

use shuken_core::leitner::record_answer;
use shuken_core::model::{Card, CardId, CardProgress, Deck, DeckId, ProgressSet};
use shuken_core::quiz::{self, StudyMode};

use super::plan::SessionBuilder;
use super::progress::{SessionProgress, SessionSummary};
use crate::error::SessionError;
use crate::settings::StudySettings;

//
// ─── ANSWER RECORD ─────────────────────────────────────────────────────────────
//

/// Captures the outcome of answering a card within a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAnswer {
    pub card_id: CardId,
    pub is_correct: bool,
    /// The card's progress record after this answer.
    pub progress: CardProgress,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One study session over a deck, owned by the caller.
///
/// The session works on its own copy of the deck's progress set. Each answer
/// replaces exactly one record in that copy; nothing is persisted until the
/// caller takes the set back with [`StudySession::into_progress_set`].
pub struct StudySession {
    deck_id: DeckId,
    mode: StudyMode,
    settings: StudySettings,
    cards: Vec<Card>,
    answer_pool: Vec<String>,
    current: usize,
    progress: ProgressSet,
    answers: Vec<SessionAnswer>,
    due_selected: usize,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl StudySession {
    /// Select cards for a new session and take ownership of the progress set.
    ///
    /// `now` should come from the services layer clock to keep time deterministic.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if the deck has no cards.
    pub fn start<R: Rng + ?Sized>(
        deck: &Deck,
        mut progress: ProgressSet,
        settings: StudySettings,
        mode: StudyMode,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        if deck.is_empty() {
            return Err(SessionError::Empty);
        }

        let plan = SessionBuilder::new(deck.cards())
            .with_min_session_size(settings.min_session_size())
            .build(&mut progress, now, rng);

        Ok(Self {
            deck_id: deck.id(),
            mode,
            settings,
            cards: plan.cards,
            answer_pool: deck.cards().iter().map(|c| c.back().to_owned()).collect(),
            current: 0,
            progress,
            answers: Vec::new(),
            due_selected: plan.due_selected,
            started_at: now,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn deck_id(&self) -> DeckId {
        self.deck_id
    }

    #[must_use]
    pub fn mode(&self) -> StudyMode {
        self.mode
    }

    #[must_use]
    pub fn settings(&self) -> &StudySettings {
        &self.settings
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// How many of the queued cards were due when the session started.
    #[must_use]
    pub fn due_selected(&self) -> usize {
        self.due_selected
    }

    #[must_use]
    pub fn answers(&self) -> &[SessionAnswer] {
        &self.answers
    }

    /// The working progress set, including records updated in this session.
    #[must_use]
    pub fn progress_set(&self) -> &ProgressSet {
        &self.progress
    }

    #[must_use]
    pub fn current_card(&self) -> Option<&Card> {
        self.cards.get(self.current)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.cards.len(),
            answered: self.answers.len(),
            remaining: self.cards.len().saturating_sub(self.current),
            is_complete: self.is_complete(),
        }
    }

    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        let correct = self.answers.iter().filter(|a| a.is_correct).count();
        SessionSummary::from_counts(correct, self.answers.len() - correct)
    }

    /// Change the study mode. Only allowed before the first answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ModeLocked` once any card has been answered.
    pub fn switch_mode(&mut self, mode: StudyMode) -> Result<(), SessionError> {
        if !self.answers.is_empty() {
            return Err(SessionError::ModeLocked);
        }
        self.mode = mode;
        Ok(())
    }

    /// Record a correct/incorrect answer for the current card and advance.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if every card was already answered.
    pub fn answer_current(
        &mut self,
        is_correct: bool,
        reviewed_at: DateTime<Utc>,
    ) -> Result<&SessionAnswer, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        let card_id = self
            .current_card()
            .map(Card::id)
            .ok_or(SessionError::Completed)?;

        let updated = record_answer(self.progress.ensure(card_id, reviewed_at), is_correct, reviewed_at);
        self.progress.insert(updated.clone());
        self.answers.push(SessionAnswer {
            card_id,
            is_correct,
            progress: updated,
        });

        self.current += 1;
        if self.current >= self.cards.len() {
            self.completed_at = Some(reviewed_at);
        }

        self.answers.last().ok_or(SessionError::Completed)
    }

    /// Grade a typed answer for the current card.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Quiz` for blank input (nothing is recorded) and
    /// `SessionError::Completed` if the session is over.
    pub fn answer_typed(
        &mut self,
        input: &str,
        reviewed_at: DateTime<Utc>,
    ) -> Result<&SessionAnswer, SessionError> {
        let card = self.current_card().ok_or(SessionError::Completed)?;
        let is_correct =
            quiz::check_typed_answer(card, input, self.settings.typed_answer_threshold())?;
        self.answer_current(is_correct, reviewed_at)
    }

    /// Grade a multiple-choice pick for the current card.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session is over.
    pub fn answer_choice(
        &mut self,
        selected: &str,
        reviewed_at: DateTime<Utc>,
    ) -> Result<&SessionAnswer, SessionError> {
        let card = self.current_card().ok_or(SessionError::Completed)?;
        let is_correct = quiz::check_choice(card, selected);
        self.answer_current(is_correct, reviewed_at)
    }

    /// Options for the current card in multiple-choice mode, drawn from the
    /// answers of the whole deck.
    pub fn choice_options<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Vec<String>> {
        let card = self.current_card()?;
        Some(quiz::multiple_choice_options(
            card,
            self.answer_pool.iter().map(String::as_str),
            self.settings.distractor_count(),
            rng,
        ))
    }

    /// Start over with the same cards in a new order.
    ///
    /// Answers already recorded stay in the progress set; only the session
    /// tallies are cleared.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.current = 0;
        self.answers.clear();
        self.completed_at = None;
        self.cards.shuffle(rng);
    }

    /// Hand back the complete progress set to persist.
    #[must_use]
    pub fn into_progress_set(self) -> ProgressSet {
        self.progress
    }
}

impl fmt::Debug for StudySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudySession")
            .field("deck_id", &self.deck_id)
            .field("mode", &self.mode)
            .field("cards_len", &self.cards.len())
            .field("current", &self.current)
            .field("answers_len", &self.answers.len())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
