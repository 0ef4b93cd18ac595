use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use shuken_core::leitner::create_progress;
use shuken_core::model::{Card, CardId, Deck, DeckId, LeitnerBox, ProgressSet};
use shuken_core::quiz::StudyMode;
use shuken_core::time::fixed_now;
use services::{Clock, SessionError, SessionLoopService, StudySettings};
use storage::{DeckRepository, InMemoryRepository, ProgressRepository, StorageError};

fn build_deck(deck_id: DeckId, count: u64) -> Deck {
    let cards = (1..=count)
        .map(|id| Card::new(CardId::new(id), format!("Q{id}"), format!("A{id}")).unwrap())
        .collect();
    Deck::new(deck_id, "Smoke Deck", None, cards, fixed_now()).unwrap()
}

fn loop_service(repo: &InMemoryRepository, clock: Clock) -> SessionLoopService {
    SessionLoopService::new(clock, Arc::new(repo.clone()), Arc::new(repo.clone())).with_seed(7)
}

#[tokio::test]
async fn session_loop_persists_progress() {
    let repo = InMemoryRepository::new();
    let deck_id = DeckId::new(1);
    repo.upsert_deck(&build_deck(deck_id, 3)).await.unwrap();

    let svc = loop_service(&repo, Clock::fixed(fixed_now()));
    let mut session = svc.start_session(deck_id, StudyMode::Flip).await.unwrap();
    assert_eq!(session.cards().len(), 3);

    while !session.is_complete() {
        svc.answer_current(&mut session, true).unwrap();
    }
    let summary = svc.finish_session(session).await.unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.accuracy, 100);

    let saved = repo.load_progress(deck_id).await.unwrap();
    assert_eq!(saved.len(), 3);
    for p in &saved {
        assert_eq!(p.leitner_box(), LeitnerBox::FIRST);
        assert_eq!(p.next_review(), fixed_now() + Duration::days(1));
    }
}

#[tokio::test]
async fn next_day_session_pads_with_not_yet_due_cards() {
    let repo = InMemoryRepository::new();
    let deck_id = DeckId::new(2);
    repo.upsert_deck(&build_deck(deck_id, 8)).await.unwrap();

    // day one: every card is new, so all eight are studied
    let svc = loop_service(&repo, Clock::fixed(fixed_now()));
    let mut session = svc.start_session(deck_id, StudyMode::Flip).await.unwrap();
    assert_eq!(session.cards().len(), 8);
    while !session.is_complete() {
        svc.answer_current(&mut session, true).unwrap();
    }
    svc.finish_session(session).await.unwrap();

    // half a day later nothing is due, so the queue is padded to the minimum
    let svc = loop_service(&repo, Clock::fixed(fixed_now() + Duration::hours(12)));
    let session = svc.start_session(deck_id, StudyMode::Flip).await.unwrap();
    assert_eq!(session.due_selected(), 0);
    assert_eq!(session.cards().len(), 5);
}

#[tokio::test]
async fn unfinished_session_is_not_saved() {
    let repo = InMemoryRepository::new();
    let deck_id = DeckId::new(3);
    repo.upsert_deck(&build_deck(deck_id, 2)).await.unwrap();

    let svc = loop_service(&repo, Clock::fixed(fixed_now()));
    let mut session = svc.start_session(deck_id, StudyMode::Flip).await.unwrap();
    svc.answer_current(&mut session, false).unwrap();

    let err = svc.finish_session(session).await.unwrap_err();
    assert!(matches!(err, SessionError::Incomplete));
    assert!(repo.load_progress(deck_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn orphaned_progress_is_written_back_untouched() {
    let repo = InMemoryRepository::new();
    let deck_id = DeckId::new(4);
    repo.upsert_deck(&build_deck(deck_id, 1)).await.unwrap();
    let orphan = create_progress(CardId::new(77), fixed_now() - Duration::days(3));
    let existing: ProgressSet = [orphan.clone()].into_iter().collect();
    repo.replace_progress(deck_id, &existing).await.unwrap();

    let svc = loop_service(&repo, Clock::fixed(fixed_now()));
    let mut session = svc.start_session(deck_id, StudyMode::Identification).await.unwrap();
    assert_eq!(session.cards().len(), 1);
    svc.answer_current(&mut session, true).unwrap();
    svc.finish_session(session).await.unwrap();

    let saved = repo.load_progress(deck_id).await.unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved.get(CardId::new(77)), Some(&orphan));
}

#[tokio::test]
async fn empty_deck_cannot_start_a_session() {
    let repo = InMemoryRepository::new();
    let deck_id = DeckId::new(5);
    repo.upsert_deck(&build_deck(deck_id, 0)).await.unwrap();

    let svc = loop_service(&repo, Clock::fixed(fixed_now()));
    let err = svc.start_session(deck_id, StudyMode::Flip).await.unwrap_err();
    assert!(matches!(err, SessionError::Empty));
}

#[tokio::test]
async fn custom_minimum_session_size_is_honored() {
    let repo = InMemoryRepository::new();
    let deck_id = DeckId::new(6);
    repo.upsert_deck(&build_deck(deck_id, 10)).await.unwrap();

    // every card answered correctly just now, so none is due
    let reviewed: ProgressSet = (1..=10)
        .map(|id| {
            let fresh = create_progress(CardId::new(id), fixed_now());
            shuken_core::record_answer(&fresh, true, fixed_now())
        })
        .collect();
    repo.replace_progress(deck_id, &reviewed).await.unwrap();

    let settings = StudySettings::new(3, 3, 0.8).unwrap();
    let svc = loop_service(&repo, Clock::fixed(fixed_now())).with_settings(settings);
    let session = svc.start_session(deck_id, StudyMode::Flip).await.unwrap();
    assert_eq!(session.cards().len(), 3);
}

/// Progress store whose writes always fail.
struct ReadOnlyProgress;

#[async_trait]
impl ProgressRepository for ReadOnlyProgress {
    async fn load_progress(&self, _deck_id: DeckId) -> Result<ProgressSet, StorageError> {
        Ok(ProgressSet::new())
    }

    async fn replace_progress(
        &self,
        _deck_id: DeckId,
        _progress: &ProgressSet,
    ) -> Result<(), StorageError> {
        Err(StorageError::Connection("read-only".into()))
    }
}

#[tokio::test]
async fn storage_failures_surface_as_session_errors() {
    let repo = InMemoryRepository::new();
    let deck_id = DeckId::new(8);
    repo.upsert_deck(&build_deck(deck_id, 1)).await.unwrap();

    let svc = SessionLoopService::new(
        Clock::fixed(fixed_now()),
        Arc::new(repo.clone()),
        Arc::new(ReadOnlyProgress),
    );

    let missing = svc
        .start_session(DeckId::new(404), StudyMode::Flip)
        .await
        .unwrap_err();
    assert!(matches!(missing, SessionError::Storage(StorageError::NotFound)));

    let mut session = svc.start_session(deck_id, StudyMode::Flip).await.unwrap();
    svc.answer_current(&mut session, true).unwrap();
    let err = svc.finish_session(session).await.unwrap_err();
    assert!(matches!(err, SessionError::Storage(StorageError::Connection(_))));
}
