use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::card::Card;
use crate::model::ids::{CardId, DeckId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("deck title cannot be empty")]
    EmptyTitle,

    #[error("card {0} already exists in this deck")]
    DuplicateCard(CardId),

    #[error("card {0} not found in this deck")]
    CardNotFound(CardId),
}

//
// ─── DECK ──────────────────────────────────────────────────────────────────────
//

/// An ordered collection of cards studied together.
///
/// Card ids are unique within a deck. Progress for the deck's cards lives
/// outside the deck, in a `ProgressSet` keyed by `CardId`.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    id: DeckId,
    title: String,
    description: Option<String>,
    cards: Vec<Card>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Deck {
    /// Creates a new deck.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::EmptyTitle` if the title is blank, or
    /// `DeckError::DuplicateCard` if two cards share an id.
    pub fn new(
        id: DeckId,
        title: impl Into<String>,
        description: Option<String>,
        cards: Vec<Card>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DeckError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(DeckError::EmptyTitle);
        }

        let mut deck = Self {
            id,
            title,
            description: description
                .map(|d| d.trim().to_owned())
                .filter(|d| !d.is_empty()),
            cards: Vec::with_capacity(cards.len()),
            created_at,
            updated_at: created_at,
        };
        for card in cards {
            deck.push_card(card)?;
        }
        Ok(deck)
    }

    #[must_use]
    pub fn id(&self) -> DeckId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id() == id)
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Appends a card to the end of the deck.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::DuplicateCard` if the id is already used.
    pub fn add_card(&mut self, card: Card, now: DateTime<Utc>) -> Result<(), DeckError> {
        self.push_card(card)?;
        self.updated_at = now;
        Ok(())
    }

    /// Replaces the card with the same id, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::CardNotFound` if no card has that id.
    pub fn update_card(&mut self, card: Card, now: DateTime<Utc>) -> Result<(), DeckError> {
        let slot = self
            .cards
            .iter_mut()
            .find(|c| c.id() == card.id())
            .ok_or(DeckError::CardNotFound(card.id()))?;
        *slot = card;
        self.updated_at = now;
        Ok(())
    }

    /// Removes a card. Its progress entry, if any, becomes an orphan.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::CardNotFound` if no card has that id.
    pub fn remove_card(&mut self, id: CardId, now: DateTime<Utc>) -> Result<Card, DeckError> {
        let index = self
            .cards
            .iter()
            .position(|c| c.id() == id)
            .ok_or(DeckError::CardNotFound(id))?;
        self.updated_at = now;
        Ok(self.cards.remove(index))
    }

    /// Renames the deck and replaces its description.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::EmptyTitle` if the new title is blank.
    pub fn rename(
        &mut self,
        title: impl Into<String>,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), DeckError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(DeckError::EmptyTitle);
        }
        self.title = title;
        self.description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());
        self.updated_at = now;
        Ok(())
    }

    fn push_card(&mut self, card: Card) -> Result<(), DeckError> {
        if self.cards.iter().any(|c| c.id() == card.id()) {
            return Err(DeckError::DuplicateCard(card.id()));
        }
        self.cards.push(card);
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
