#![forbid(unsafe_code)]

pub mod records;
pub mod repository;

pub use records::{ProgressRecord, decode_progress_set, encode_progress_set};
pub use repository::{
    DeckRepository, InMemoryRepository, ProgressRepository, Storage, StorageError,
};
