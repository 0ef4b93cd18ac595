mod plan;
mod progress;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{SessionBuilder, SessionPlan};
pub use progress::{DeckOverview, SessionProgress, SessionSummary};
pub use service::{SessionAnswer, StudySession};
pub use workflow::{SessionAnswerResult, SessionLoopService};
