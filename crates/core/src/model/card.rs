use thiserror::Error;

use crate::model::ids::CardId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardError {
    #[error("card front cannot be empty")]
    EmptyFront,

    #[error("card back cannot be empty")]
    EmptyBack,
}

//
// ─── CARD ──────────────────────────────────────────────────────────────────────
//

/// A single flashcard: a prompt on the front and its answer on the back.
///
/// Both sides are stored trimmed and are never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    id: CardId,
    front: String,
    back: String,
}

impl Card {
    /// Creates a card, trimming both sides.
    ///
    /// # Errors
    ///
    /// Returns `CardError::EmptyFront` or `CardError::EmptyBack` if a side is
    /// blank after trimming.
    pub fn new(
        id: CardId,
        front: impl Into<String>,
        back: impl Into<String>,
    ) -> Result<Self, CardError> {
        let front = normalize_side(front.into()).ok_or(CardError::EmptyFront)?;
        let back = normalize_side(back.into()).ok_or(CardError::EmptyBack)?;
        Ok(Self { id, front, back })
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub fn front(&self) -> &str {
        &self.front
    }

    #[must_use]
    pub fn back(&self) -> &str {
        &self.back
    }

    /// Replaces both sides, keeping the id.
    ///
    /// # Errors
    ///
    /// Same as [`Card::new`]; the card is left untouched on error.
    pub fn update(
        &mut self,
        front: impl Into<String>,
        back: impl Into<String>,
    ) -> Result<(), CardError> {
        let updated = Self::new(self.id, front, back)?;
        *self = updated;
        Ok(())
    }
}

fn normalize_side(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == raw.len() {
        Some(raw)
    } else {
        Some(trimmed.to_owned())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
