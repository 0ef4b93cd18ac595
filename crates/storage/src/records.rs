//! JSON shape of a persisted progress set.
//!
//! A progress set is stored as an array of records with camelCase keys and
//! RFC 3339 timestamps. Decoding goes through `CardProgress::from_persisted`,
//! so out-of-range boxes and counters are repaired rather than rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shuken_core::model::{CardId, CardProgress, ProgressSet};

use crate::repository::StorageError;

/// Card ids written by older clients are decimal strings; newer ones are numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
enum RawCardId {
    Number(u64),
    Text(String),
}

impl RawCardId {
    fn parse(&self) -> Result<CardId, StorageError> {
        match self {
            RawCardId::Number(n) => Ok(CardId::new(*n)),
            RawCardId::Text(s) => s
                .parse()
                .map_err(|e: shuken_core::model::ParseIdError| {
                    StorageError::Serialization(e.to_string())
                }),
        }
    }
}

/// Persisted shape for a card's progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    card_id: RawCardId,
    #[serde(rename = "box")]
    leitner_box: i64,
    #[serde(default)]
    last_reviewed: Option<DateTime<Utc>>,
    next_review: DateTime<Utc>,
    #[serde(default)]
    correct_streak: u32,
    #[serde(default)]
    total_reviews: u32,
    #[serde(default)]
    correct_reviews: u32,
}

impl ProgressRecord {
    #[must_use]
    pub fn from_progress(progress: &CardProgress) -> Self {
        Self {
            card_id: RawCardId::Number(progress.card_id().value()),
            leitner_box: i64::from(progress.leitner_box().level()),
            last_reviewed: progress.last_reviewed(),
            next_review: progress.next_review(),
            correct_streak: progress.correct_streak(),
            total_reviews: progress.total_reviews(),
            correct_reviews: progress.correct_reviews(),
        }
    }

    /// Convert the record back into a domain `CardProgress`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the card id is not a valid id.
    pub fn into_progress(self) -> Result<CardProgress, StorageError> {
        Ok(CardProgress::from_persisted(
            self.card_id.parse()?,
            self.leitner_box,
            self.last_reviewed,
            self.next_review,
            self.correct_streak,
            self.total_reviews,
            self.correct_reviews,
        ))
    }
}

/// Serialize a progress set as a JSON array, ordered by card id.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_progress_set(progress: &ProgressSet) -> Result<String, StorageError> {
    let records: Vec<ProgressRecord> = progress.iter().map(ProgressRecord::from_progress).collect();
    serde_json::to_string(&records).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Parse a JSON array of progress records.
///
/// Later records win when the same card appears twice.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON or card ids.
pub fn decode_progress_set(json: &str) -> Result<ProgressSet, StorageError> {
    let records: Vec<ProgressRecord> =
        serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))?;
    records
        .into_iter()
        .map(ProgressRecord::into_progress)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use shuken_core::leitner::{create_progress, record_answer};
    use shuken_core::model::LeitnerBox;
    use shuken_core::time::fixed_now;

    #[test]
    fn reviewed_progress_survives_encoding() {
        let now = fixed_now() + Duration::milliseconds(250);
        let mut p = create_progress(CardId::new(1), now);
        p = record_answer(&p, true, now);
        p = record_answer(&p, true, now + Duration::days(1));
        let set: ProgressSet = [p.clone(), create_progress(CardId::new(2), now)]
            .into_iter()
            .collect();

        let decoded = decode_progress_set(&encode_progress_set(&set).unwrap()).unwrap();

        assert_eq!(decoded, set);
        let back = decoded.get(CardId::new(1)).unwrap();
        assert_eq!(back.next_review() - back.last_reviewed().unwrap(), Duration::days(3));
    }

    #[test]
    fn encoded_keys_are_camel_case() {
        let set: ProgressSet = [create_progress(CardId::new(4), fixed_now())]
            .into_iter()
            .collect();
        let json = encode_progress_set(&set).unwrap();
        assert!(json.contains("\"cardId\":4"));
        assert!(json.contains("\"box\":0"));
        assert!(json.contains("\"lastReviewed\":null"));
        assert!(json.contains("\"nextReview\":\"2023-11-14T22:13:20Z\""));
    }

    #[test]
    fn decode_accepts_string_ids_and_repairs_box() {
        let json = r#"[
            {"cardId": "17", "box": 9, "lastReviewed": "2023-11-14T22:13:20.000Z",
             "nextReview": "2023-12-14T22:13:20.000Z", "correctStreak": 3,
             "totalReviews": 5, "correctReviews": 4},
            {"cardId": 18, "box": -2, "nextReview": "2023-11-14T22:13:20Z"}
        ]"#;

        let set = decode_progress_set(json).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.get(CardId::new(17)).unwrap().leitner_box(),
            LeitnerBox::MASTERED
        );
        let fresh = set.get(CardId::new(18)).unwrap();
        assert_eq!(fresh.leitner_box(), LeitnerBox::NEW);
        assert_eq!(fresh.total_reviews(), 0);
    }

    #[test]
    fn decode_rejects_bad_ids() {
        let json = r#"[{"cardId": "abc", "box": 1, "nextReview": "2023-11-14T22:13:20Z"}]"#;
        assert!(matches!(
            decode_progress_set(json),
            Err(StorageError::Serialization(_))
        ));
        assert!(matches!(
            decode_progress_set("{not json"),
            Err(StorageError::Serialization(_))
        ));
    }
}
