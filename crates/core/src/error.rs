use thiserror::Error;

use crate::model::{CardError, DeckError};
use crate::quiz::QuizError;

/// Any error raised by the core crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Card(#[from] CardError),
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}
