#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;
pub mod settings;
pub mod stats_service;

pub use shuken_core::Clock;
pub use sessions as session;

pub use error::{SessionError, SettingsError};
pub use settings::StudySettings;
pub use stats_service::DeckStatsService;

pub use sessions::{
    DeckOverview, SessionAnswer, SessionAnswerResult, SessionLoopService, SessionProgress,
    SessionSummary, StudySession,
};
