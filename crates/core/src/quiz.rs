//! Answer checking for the study modes.
//!
//! Every mode boils down to one boolean per card, which is what
//! `leitner::record_answer` consumes.

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::Card;

/// Distractors shown next to the correct answer in multiple choice.
pub const DEFAULT_DISTRACTOR_COUNT: usize = 3;

/// Highest fuzzy score still accepted for a typed answer (0 = identical, 1 = unrelated).
pub const DEFAULT_TYPED_ANSWER_THRESHOLD: f64 = 0.8;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("answer cannot be empty")]
    EmptyAnswer,

    #[error("unknown study mode: {0}")]
    UnknownMode(String),
}

//
// ─── STUDY MODE ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StudyMode {
    /// Reveal the back and let the learner say whether they knew it.
    #[default]
    Flip,
    /// Pick the back among a few distractors.
    MultipleChoice,
    /// Type the back from memory.
    Identification,
}

impl StudyMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StudyMode::Flip => "flip",
            StudyMode::MultipleChoice => "multiple_choice",
            StudyMode::Identification => "identification",
        }
    }
}

impl fmt::Display for StudyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudyMode {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "flip" => Ok(Self::Flip),
            "multiple_choice" => Ok(Self::MultipleChoice),
            "identification" => Ok(Self::Identification),
            other => Err(QuizError::UnknownMode(other.to_owned())),
        }
    }
}

//
// ─── FLIP ──────────────────────────────────────────────────────────────────────
//

/// Flip cards are self-graded.
#[must_use]
pub fn flip_answer(knew_it: bool) -> bool {
    knew_it
}

//
// ─── MULTIPLE CHOICE ───────────────────────────────────────────────────────────
//

/// Pick up to `count` distinct wrong answers from `all_answers`.
///
/// Answers equal to `correct` are never picked. Fewer than `count` are
/// returned when the pool runs out.
pub fn generate_distractors<'a, R: Rng + ?Sized>(
    correct: &str,
    all_answers: impl IntoIterator<Item = &'a str>,
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut pool: Vec<&str> = all_answers
        .into_iter()
        .filter(|answer| *answer != correct && seen.insert(*answer))
        .collect();

    pool.shuffle(rng);
    pool.into_iter().take(count).map(str::to_owned).collect()
}

/// The card's answer mixed with distractors, in random order.
pub fn multiple_choice_options<'a, R: Rng + ?Sized>(
    card: &Card,
    all_answers: impl IntoIterator<Item = &'a str>,
    distractor_count: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut options = generate_distractors(card.back(), all_answers, distractor_count, rng);
    options.push(card.back().to_owned());
    options.shuffle(rng);
    options
}

#[must_use]
pub fn check_choice(card: &Card, selected: &str) -> bool {
    selected == card.back()
}

//
// ─── IDENTIFICATION ────────────────────────────────────────────────────────────
//

/// Lowercase, trim, drop punctuation and collapse whitespace.
///
/// Letters and digits of any script are kept, so answers in kana or
/// Cyrillic still compare meaningfully.
#[must_use]
pub fn normalize_text(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Distance between two strings in `0.0..=1.0`; 0 means identical.
#[must_use]
pub fn fuzzy_score(input: &str, target: &str) -> f64 {
    1.0 - strsim::normalized_levenshtein(input, target)
}

#[must_use]
pub fn fuzzy_match(input: &str, target: &str, threshold: f64) -> bool {
    fuzzy_score(input, target) <= threshold
}

/// Grade a typed answer against the card's back.
///
/// Exact matches after normalization always pass; otherwise the fuzzy score
/// must not exceed `threshold`.
///
/// # Errors
///
/// Returns `QuizError::EmptyAnswer` if `input` is blank. Blank submissions
/// are ignored rather than graded as wrong.
pub fn check_typed_answer(card: &Card, input: &str, threshold: f64) -> Result<bool, QuizError> {
    if input.trim().is_empty() {
        return Err(QuizError::EmptyAnswer);
    }

    let answer = normalize_text(input);
    let expected = normalize_text(card.back());
    Ok(answer == expected || fuzzy_match(&answer, &expected, threshold))
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CardId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn card(back: &str) -> Card {
        Card::new(CardId::new(1), "prompt", back).unwrap()
    }

    #[test]
    fn study_mode_round_trips_through_str() {
        for mode in [
            StudyMode::Flip,
            StudyMode::MultipleChoice,
            StudyMode::Identification,
        ] {
            assert_eq!(mode.as_str().parse::<StudyMode>().unwrap(), mode);
        }
        assert_eq!(
            "quiz".parse::<StudyMode>(),
            Err(QuizError::UnknownMode("quiz".into()))
        );
    }

    #[test]
    fn normalize_strips_punctuation_and_whitespace() {
        assert_eq!(normalize_text("  Hello,   World! "), "hello world");
        assert_eq!(normalize_text("snake_case"), "snake_case");
        assert_eq!(normalize_text("か。"), "か");
    }

    #[test]
    fn typed_answer_accepts_normalized_match() {
        let c = card("The Capital, Paris");
        assert_eq!(check_typed_answer(&c, "the capital paris", 0.0), Ok(true));
    }

    #[test]
    fn typed_answer_uses_fuzzy_threshold() {
        let c = card("necessary");
        assert_eq!(check_typed_answer(&c, "neccessary", 0.2), Ok(true));
        assert_eq!(check_typed_answer(&c, "apple", 0.2), Ok(false));
    }

    #[test]
    fn typed_answer_rejects_blank_input() {
        let c = card("56");
        assert_eq!(check_typed_answer(&c, "   ", 0.8), Err(QuizError::EmptyAnswer));
    }

    #[test]
    fn non_latin_answers_are_not_trivially_equal() {
        let c = card("か");
        assert_eq!(check_typed_answer(&c, "さ", 0.5), Ok(false));
        assert_eq!(check_typed_answer(&c, "か", 0.0), Ok(true));
    }

    #[test]
    fn distractors_are_distinct_and_exclude_answer() {
        let mut rng = StdRng::seed_from_u64(7);
        let answers = ["a", "ka", "sa", "ka", "ta", "na", "a"];
        let picked = generate_distractors("a", answers, 3, &mut rng);

        assert_eq!(picked.len(), 3);
        assert!(!picked.iter().any(|d| d == "a"));
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn distractors_stop_when_pool_runs_out() {
        let mut rng = StdRng::seed_from_u64(1);
        let picked = generate_distractors("56", ["56", "12"], 3, &mut rng);
        assert_eq!(picked, vec!["12".to_owned()]);
    }

    #[test]
    fn options_contain_answer_once() {
        let mut rng = StdRng::seed_from_u64(42);
        let c = card("8");
        let options = multiple_choice_options(&c, ["56", "12", "8", "30", "8"], 3, &mut rng);

        assert_eq!(options.len(), 4);
        assert_eq!(options.iter().filter(|o| o.as_str() == "8").count(), 1);
        assert!(options.iter().any(|o| check_choice(&c, o)));
        assert!(!check_choice(&c, "56"));
    }

    #[test]
    fn flip_passes_self_grade_through() {
        assert!(flip_answer(true));
        assert!(!flip_answer(false));
    }
}
