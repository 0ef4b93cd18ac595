use async_trait::async_trait;
use shuken_core::model::{Deck, DeckId, ProgressSet};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for decks.
#[async_trait]
pub trait DeckRepository: Send + Sync {
    /// Persist or update a deck.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the deck cannot be stored.
    async fn upsert_deck(&self, deck: &Deck) -> Result<(), StorageError>;

    /// Fetch a deck by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_deck(&self, id: DeckId) -> Result<Deck, StorageError>;

    /// Delete a deck together with its progress set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the deck does not exist.
    async fn delete_deck(&self, id: DeckId) -> Result<(), StorageError>;
}

/// Repository contract for per-deck progress sets.
///
/// Progress is always read and written as a whole snapshot; there is no
/// per-card write.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load the deck's progress set. A deck that was never studied yields an empty set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    async fn load_progress(&self, deck_id: DeckId) -> Result<ProgressSet, StorageError>;

    /// Replace the deck's progress set wholesale.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be stored.
    async fn replace_progress(
        &self,
        deck_id: DeckId,
        progress: &ProgressSet,
    ) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    decks: Arc<Mutex<HashMap<DeckId, Deck>>>,
    progress: Arc<Mutex<HashMap<DeckId, ProgressSet>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl DeckRepository for InMemoryRepository {
    async fn upsert_deck(&self, deck: &Deck) -> Result<(), StorageError> {
        let mut guard = self.decks.lock().map_err(poisoned)?;
        guard.insert(deck.id(), deck.clone());
        Ok(())
    }

    async fn get_deck(&self, id: DeckId) -> Result<Deck, StorageError> {
        let guard = self.decks.lock().map_err(poisoned)?;
        guard.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn delete_deck(&self, id: DeckId) -> Result<(), StorageError> {
        let mut decks = self.decks.lock().map_err(poisoned)?;
        decks.remove(&id).ok_or(StorageError::NotFound)?;
        let mut progress = self.progress.lock().map_err(poisoned)?;
        progress.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_progress(&self, deck_id: DeckId) -> Result<ProgressSet, StorageError> {
        let guard = self.progress.lock().map_err(poisoned)?;
        Ok(guard.get(&deck_id).cloned().unwrap_or_default())
    }

    async fn replace_progress(
        &self,
        deck_id: DeckId,
        progress: &ProgressSet,
    ) -> Result<(), StorageError> {
        let mut guard = self.progress.lock().map_err(poisoned)?;
        guard.insert(deck_id, progress.clone());
        Ok(())
    }
}

/// Aggregates deck and progress repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub decks: Arc<dyn DeckRepository>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let decks: Arc<dyn DeckRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Self { decks, progress }
    }
}
