//! Shared error types for the services crate.

use thiserror::Error;

use shuken_core::quiz::QuizError;
use storage::StorageError;

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no cards available for session")]
    Empty,
    #[error("session already completed")]
    Completed,
    #[error("session still has unanswered cards")]
    Incomplete,
    #[error("study mode cannot change after the first answer")]
    ModeLocked,
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while loading `StudySettings`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("minimum session size must be > 0")]
    InvalidMinSessionSize,
    #[error("typed answer threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}
