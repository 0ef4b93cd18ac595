#![forbid(unsafe_code)]

pub mod error;
pub mod leitner;
pub mod model;
pub mod quiz;
pub mod time;

pub use error::Error;
pub use leitner::{DeckStats, create_progress, deck_stats, due_cards, record_answer};
pub use quiz::StudyMode;
pub use time::Clock;
