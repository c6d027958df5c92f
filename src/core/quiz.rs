use crate::core::normalizer::coerce_text;
use crate::domain::model::QuizQuestion;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static LETTER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-D]\)\s*").expect("option label pattern"));

pub const DEFAULT_ANSWER: char = 'A';
pub const MISSING_QUESTION: &str = "Question missing";

/// Turns one raw quiz entry into a canonical question.
#[derive(Debug, Clone)]
pub struct QuizResolver {
    relabel_options: bool,
}

impl Default for QuizResolver {
    fn default() -> Self {
        Self {
            relabel_options: true,
        }
    }
}

impl QuizResolver {
    pub fn new(relabel_options: bool) -> Self {
        Self { relabel_options }
    }

    pub fn resolve_question(&self, raw: &Value) -> QuizQuestion {
        let options = match raw.get("options") {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let option = coerce_text(Some(item)).unwrap_or_default();
                    if self.relabel_options {
                        label_option(index, option.trim())
                    } else {
                        option.trim().to_string()
                    }
                })
                .collect(),
            _ => Vec::new(),
        };

        let raw_answer = coerce_text(raw.get("answer")).unwrap_or_default();
        let answer = resolve_answer(&raw_answer);
        if answer.to_string() != raw_answer {
            tracing::debug!(raw = %raw_answer, resolved = %answer, "Repaired quiz answer");
        }

        QuizQuestion {
            question: coerce_text(raw.get("question"))
                .filter(|q| !q.trim().is_empty())
                .unwrap_or_else(|| MISSING_QUESTION.to_string()),
            options,
            answer: answer.to_string(),
            explanation: coerce_text(raw.get("explanation")).unwrap_or_default(),
        }
    }
}

/// Prefixes `A) `, `B) `, ... unless the option already carries its own label.
/// Options past `Z` are left alone.
pub fn label_option(index: usize, option: &str) -> String {
    let Some(letter) = u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map(|i| char::from(b'A' + i))
    else {
        return option.to_string();
    };

    if option.starts_with(&format!("{}) ", letter)) {
        return option.to_string();
    }
    format!("{}) {}", letter, LETTER_PREFIX.replace(option, ""))
}

/// Maps a free-form answer to a single letter `A`-`D`.
pub fn resolve_answer(raw: &str) -> char {
    let trimmed = raw.trim();
    let upper = trimmed.to_uppercase();

    let mut chars = upper.chars();
    if let (Some(c @ 'A'..='D'), None) = (chars.next(), chars.next()) {
        return c;
    }

    upper
        .chars()
        .find(|c| matches!(c, 'A'..='D'))
        .unwrap_or(DEFAULT_ANSWER)
}

pub fn is_canonical_answer(answer: &str) -> bool {
    let mut chars = answer.chars();
    matches!((chars.next(), chars.next()), (Some('A'..='D'), None))
}
