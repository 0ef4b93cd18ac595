use rand::rngs::StdRng;
use rand::{SeedableRng, rng};
use std::sync::Arc;
use tracing::{debug, info};

use shuken_core::model::DeckId;
use shuken_core::quiz::StudyMode;
use shuken_core::time::Clock;
use storage::{DeckRepository, ProgressRepository};

use super::progress::SessionSummary;
use super::service::{SessionAnswer, StudySession};
use crate::error::SessionError;
use crate::settings::StudySettings;

/// Result of answering a single card in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAnswerResult {
    pub answer: SessionAnswer,
    pub is_complete: bool,
}

/// Orchestrates loading a deck, running a session and persisting its progress.
///
/// The progress set is read once when the session starts and written back
/// whole when it finishes. Two sessions on the same deck must not overlap;
/// the last one to finish wins.
#[derive(Clone)]
pub struct SessionLoopService {
    clock: Clock,
    decks: Arc<dyn DeckRepository>,
    progress: Arc<dyn ProgressRepository>,
    settings: StudySettings,
    seed: Option<u64>,
}

impl SessionLoopService {
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
            settings: StudySettings::default(),
            seed: None,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: StudySettings) -> Self {
        self.settings = settings;
        self
    }

    /// Use a fixed seed for card selection and shuffling.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rng()),
        }
    }

    /// Start a new session for the given deck.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the deck or its progress cannot be
    /// loaded, and `SessionError::Empty` if the deck has no cards.
    pub async fn start_session(
        &self,
        deck_id: DeckId,
        mode: StudyMode,
    ) -> Result<StudySession, SessionError> {
        let deck = self.decks.get_deck(deck_id).await?;
        let progress = self.progress.load_progress(deck_id).await?;
        let now = self.clock.now();

        let session = StudySession::start(
            &deck,
            progress,
            self.settings.clone(),
            mode,
            now,
            &mut self.rng(),
        )?;

        info!(
            deck = %deck_id,
            mode = %mode,
            due = session.due_selected(),
            queued = session.cards().len(),
            "study session started"
        );
        Ok(session)
    }

    /// Answer the current card with a correctness signal from any study mode.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session is over.
    pub fn answer_current(
        &self,
        session: &mut StudySession,
        is_correct: bool,
    ) -> Result<SessionAnswerResult, SessionError> {
        let answer = session.answer_current(is_correct, self.clock.now())?.clone();
        debug!(
            card = %answer.card_id,
            correct = is_correct,
            leitner_box = %answer.progress.leitner_box(),
            next_review = %answer.progress.next_review(),
            "answer recorded"
        );
        Ok(SessionAnswerResult {
            answer,
            is_complete: session.is_complete(),
        })
    }

    /// Reshuffle and replay the session's cards.
    pub fn restart_session(&self, session: &mut StudySession) {
        session.restart(&mut self.rng());
        debug!(deck = %session.deck_id(), "study session restarted");
    }

    /// Persist the session's progress set and return its summary.
    ///
    /// Dropping a session without finishing it discards its answers.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Incomplete` if cards remain unanswered, or
    /// `SessionError::Storage` if the write fails.
    pub async fn finish_session(
        &self,
        session: StudySession,
    ) -> Result<SessionSummary, SessionError> {
        if !session.is_complete() {
            return Err(SessionError::Incomplete);
        }

        let deck_id = session.deck_id();
        let summary = session.summary();
        let progress = session.into_progress_set();
        self.progress.replace_progress(deck_id, &progress).await?;

        info!(
            deck = %deck_id,
            correct = summary.correct,
            incorrect = summary.incorrect,
            accuracy = summary.accuracy,
            "study session saved"
        );
        Ok(summary)
    }
}
