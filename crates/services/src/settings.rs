use serde::{Deserialize, Serialize};

use shuken_core::quiz::{DEFAULT_DISTRACTOR_COUNT, DEFAULT_TYPED_ANSWER_THRESHOLD};

use crate::error::SettingsError;

/// Smallest queue a study session tries to fill before giving up.
pub const DEFAULT_MIN_SESSION_SIZE: usize = 5;

/// Tunables for study sessions.
///
/// Every field has a default, so a partial JSON object (or `{}`) is a valid
/// configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudySettings {
    min_session_size: usize,
    distractor_count: usize,
    typed_answer_threshold: f64,
}

impl Default for StudySettings {
    fn default() -> Self {
        Self {
            min_session_size: DEFAULT_MIN_SESSION_SIZE,
            distractor_count: DEFAULT_DISTRACTOR_COUNT,
            typed_answer_threshold: DEFAULT_TYPED_ANSWER_THRESHOLD,
        }
    }
}

impl StudySettings {
    /// Creates custom settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the session size is zero or the threshold
    /// is outside `[0, 1]`.
    pub fn new(
        min_session_size: usize,
        distractor_count: usize,
        typed_answer_threshold: f64,
    ) -> Result<Self, SettingsError> {
        Self {
            min_session_size,
            distractor_count,
            typed_answer_threshold,
        }
        .validate()
    }

    /// Parse settings from JSON, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Parse` for malformed JSON or unknown keys, and
    /// the validation errors of [`StudySettings::new`].
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let parsed: Self = serde_json::from_str(json)?;
        parsed.validate()
    }

    /// # Errors
    ///
    /// See [`StudySettings::new`].
    pub fn validate(self) -> Result<Self, SettingsError> {
        if self.min_session_size == 0 {
            return Err(SettingsError::InvalidMinSessionSize);
        }
        if !(0.0..=1.0).contains(&self.typed_answer_threshold) {
            return Err(SettingsError::InvalidThreshold(self.typed_answer_threshold));
        }
        Ok(self)
    }

    #[must_use]
    pub fn min_session_size(&self) -> usize {
        self.min_session_size
    }

    #[must_use]
    pub fn distractor_count(&self) -> usize {
        self.distractor_count
    }

    #[must_use]
    pub fn typed_answer_threshold(&self) -> f64 {
        self.typed_answer_threshold
    }
}
