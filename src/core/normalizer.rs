//! Turns an untrusted JSON value into a [`CourseDocument`].
//!
//! Two policies are available. `Tolerant` never fails: every missing or
//! mistyped field is replaced by a default. `Strict` rejects the document on
//! the first top-level field that is missing or has the wrong shape.

use crate::core::quiz::{is_canonical_answer, QuizResolver};
use crate::domain::model::{CourseDocument, GlossaryItem, Lesson, Module};
use crate::utils::error::{CourseError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const TITLE_PLACEHOLDER: &str = "course generated — title unavailable";
pub const SUMMARY_PLACEHOLDER: &str = "summary not available";
pub const PLACEHOLDER_MODULE_TITLE: &str = "Introduction";
pub const PLACEHOLDER_MODULE_INTRODUCTION: &str = "content being generated...";
pub const DEFAULT_LESSON_TITLE: &str = "Lesson";
pub const DEFAULT_LESSON_CONTENT: &str = "content unavailable.";

/// Top-level fields in the order strict validation checks them.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "title",
    "objectives",
    "modules",
    "glossary",
    "study_tips",
    "final_summary",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum NormalizationMode {
    Strict,
    #[default]
    Tolerant,
}

impl std::fmt::Display for NormalizationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizationMode::Strict => write!(f, "strict"),
            NormalizationMode::Tolerant => write!(f, "tolerant"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    mode: NormalizationMode,
    quiz: QuizResolver,
}

impl Normalizer {
    pub fn new(mode: NormalizationMode, quiz: QuizResolver) -> Self {
        Self { mode, quiz }
    }

    pub fn mode(&self) -> NormalizationMode {
        self.mode
    }

    pub fn normalize(&self, value: &Value) -> Result<CourseDocument> {
        match self.mode {
            NormalizationMode::Tolerant => Ok(self.normalize_tolerant(value)),
            NormalizationMode::Strict => validate_strict(value),
        }
    }

    pub fn normalize_tolerant(&self, value: &Value) -> CourseDocument {
        let title = coerce_text(value.get("title"))
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| TITLE_PLACEHOLDER.to_string());

        let mut modules: Vec<Module> = match value.get("modules") {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(index, raw)| self.normalize_module(index, raw))
                .collect(),
            _ => Vec::new(),
        };
        if modules.is_empty() {
            tracing::debug!("No modules survived normalization, adding placeholder");
            modules.push(placeholder_module());
        }

        let glossary = match value.get("glossary") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| GlossaryItem {
                    term: coerce_text(item.get("term")).unwrap_or_default(),
                    definition: coerce_text(item.get("definition")).unwrap_or_default(),
                })
                .collect(),
            _ => Vec::new(),
        };

        CourseDocument {
            title,
            objectives: coerce_text_list(value.get("objectives")),
            modules,
            glossary,
            study_tips: coerce_text_list(value.get("study_tips")),
            final_summary: coerce_text(value.get("final_summary"))
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| SUMMARY_PLACEHOLDER.to_string()),
        }
    }

    fn normalize_module(&self, index: usize, raw: &Value) -> Module {
        let lessons = match raw.get("lessons") {
            Some(Value::Array(items)) => items.iter().map(normalize_lesson).collect(),
            _ => Vec::new(),
        };
        let quiz = match raw.get("quiz") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|q| self.quiz.resolve_question(q))
                .collect(),
            _ => Vec::new(),
        };

        Module {
            module_title: non_blank(raw.get("module_title"))
                .unwrap_or_else(|| format!("Module {}", index + 1)),
            introduction: coerce_text(raw.get("introduction")).unwrap_or_default(),
            lessons,
            quiz,
        }
    }
}

fn normalize_lesson(raw: &Value) -> Lesson {
    Lesson {
        lesson_title: non_blank(raw.get("lesson_title"))
            .unwrap_or_else(|| DEFAULT_LESSON_TITLE.to_string()),
        content: non_blank(raw.get("content"))
            .unwrap_or_else(|| DEFAULT_LESSON_CONTENT.to_string()),
        example: coerce_text(raw.get("example")).unwrap_or_default(),
    }
}

fn placeholder_module() -> Module {
    Module {
        module_title: PLACEHOLDER_MODULE_TITLE.to_string(),
        introduction: PLACEHOLDER_MODULE_INTRODUCTION.to_string(),
        lessons: Vec::new(),
        quiz: Vec::new(),
    }
}

/// String conversion for untrusted values. `null` and absent count as missing;
/// numbers and booleans print as themselves; nested values print as compact JSON.
pub fn coerce_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        nested => Some(nested.to_string()),
    }
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    coerce_text(value).filter(|s| !s.trim().is_empty())
}

fn coerce_text_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| coerce_text(Some(v)))
            .collect(),
        _ => Vec::new(),
    }
}

type Check = std::result::Result<(), String>;

/// Rejects the document on the first required field that is missing or mistyped.
pub fn validate_strict(value: &Value) -> Result<CourseDocument> {
    let Some(map) = value.as_object() else {
        return Err(CourseError::Validation {
            field: "document".to_string(),
            detail: "expected a JSON object".to_string(),
        });
    };

    for field in REQUIRED_FIELDS {
        let Some(field_value) = map.get(field) else {
            tracing::warn!(field, "Required field is missing");
            return Err(CourseError::Validation {
                field: field.to_string(),
                detail: "field is missing".to_string(),
            });
        };

        let check = match field {
            "title" | "final_summary" => expect_string(field_value, field),
            "modules" => check_modules(field_value),
            "glossary" => check_glossary(field_value),
            _ => expect_string_list(field_value, field),
        };

        if let Err(detail) = check {
            tracing::warn!(field, %detail, "Required field has the wrong shape");
            return Err(CourseError::Validation {
                field: field.to_string(),
                detail,
            });
        }
    }

    serde_json::from_value(value.clone()).map_err(|e| CourseError::Validation {
        field: "document".to_string(),
        detail: e.to_string(),
    })
}

fn expect_string(value: &Value, path: &str) -> Check {
    if value.is_string() {
        Ok(())
    } else {
        Err(format!("{} must be a string", path))
    }
}

fn expect_string_list(value: &Value, path: &str) -> Check {
    match value.as_array() {
        Some(items) if items.iter().all(Value::is_string) => Ok(()),
        _ => Err(format!("{} must be an array of strings", path)),
    }
}

fn expect_field<'a>(
    value: &'a Value,
    key: &str,
    path: &str,
) -> std::result::Result<&'a Value, String> {
    value
        .get(key)
        .ok_or_else(|| format!("{}.{} is missing", path, key))
}

fn expect_string_at(value: &Value, key: &str, path: &str) -> Check {
    expect_string(expect_field(value, key, path)?, &format!("{}.{}", path, key))
}

fn expect_array<'a>(
    value: &'a Value,
    key: &str,
    path: &str,
) -> std::result::Result<&'a Vec<Value>, String> {
    expect_field(value, key, path)?
        .as_array()
        .ok_or_else(|| format!("{}.{} must be an array", path, key))
}

fn check_modules(value: &Value) -> Check {
    let modules = value.as_array().ok_or("modules must be an array")?;

    for (i, module) in modules.iter().enumerate() {
        let path = format!("modules[{}]", i);
        expect_string_at(module, "module_title", &path)?;
        expect_string_at(module, "introduction", &path)?;

        for (j, lesson) in expect_array(module, "lessons", &path)?.iter().enumerate() {
            let lesson_path = format!("{}.lessons[{}]", path, j);
            expect_string_at(lesson, "lesson_title", &lesson_path)?;
            expect_string_at(lesson, "content", &lesson_path)?;
            if lesson.get("example").is_some() {
                expect_string_at(lesson, "example", &lesson_path)?;
            }
        }

        for (j, question) in expect_array(module, "quiz", &path)?.iter().enumerate() {
            let q_path = format!("{}.quiz[{}]", path, j);
            expect_string_at(question, "question", &q_path)?;
            expect_string_list(
                expect_field(question, "options", &q_path)?,
                &format!("{}.options", q_path),
            )?;
            expect_string_at(question, "explanation", &q_path)?;

            match expect_field(question, "answer", &q_path)?.as_str() {
                Some(answer) if is_canonical_answer(answer) => {}
                _ => return Err(format!("{}.answer must be a single letter A-D", q_path)),
            }
        }
    }
    Ok(())
}

fn check_glossary(value: &Value) -> Check {
    let items = value.as_array().ok_or("glossary must be an array")?;
    for (i, item) in items.iter().enumerate() {
        let path = format!("glossary[{}]", i);
        expect_string_at(item, "term", &path)?;
        expect_string_at(item, "definition", &path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_course() -> Value {
        json!({
            "title": "Rust Basics",
            "objectives": ["Learn ownership"],
            "modules": [{
                "module_title": "Ownership",
                "introduction": "Who owns what",
                "lessons": [{"lesson_title": "Moves", "content": "Values move", "example": "let b = a;"}],
                "quiz": [{
                    "question": "What happens on assignment?",
                    "options": ["A) Move", "B) Copy"],
                    "answer": "A",
                    "explanation": "Non-Copy types move."
                }]
            }],
            "glossary": [{"term": "Borrow", "definition": "A reference"}],
            "study_tips": ["Read the book"],
            "final_summary": "You learned ownership."
        })
    }

    #[test]
    fn test_tolerant_keeps_complete_course() {
        let doc = Normalizer::default().normalize_tolerant(&complete_course());
        assert_eq!(doc.title, "Rust Basics");
        assert_eq!(doc.modules[0].lessons[0].example, "let b = a;");
        assert_eq!(doc.modules[0].quiz[0].answer, "A");
        assert_eq!(doc.glossary[0].term, "Borrow");
    }

    #[test]
    fn test_tolerant_is_idempotent() {
        let normalizer = Normalizer::default();
        let first = normalizer.normalize_tolerant(&complete_course());
        let again = normalizer.normalize_tolerant(&serde_json::to_value(&first).unwrap());
        assert_eq!(first, again);

        let sparse = normalizer.normalize_tolerant(&json!({
            "modules": [{"quiz": [{"options": ["x"], "answer": "zzz"}]}]
        }));
        let sparse_again =
            normalizer.normalize_tolerant(&serde_json::to_value(&sparse).unwrap());
        assert_eq!(sparse, sparse_again);
    }

    #[test]
    fn test_tolerant_totality_on_odd_inputs() {
        let normalizer = Normalizer::default();
        for input in [
            json!({}),
            json!(null),
            json!(42),
            json!("text"),
            json!([1, 2]),
            json!({"title": null, "objectives": "nope", "modules": {"a": 1}, "glossary": 3}),
            json!({"modules": [null, 5, "m", {"lessons": "x", "quiz": null}]}),
        ] {
            let doc = normalizer.normalize_tolerant(&input);
            assert!(!doc.title.trim().is_empty());
            assert!(!doc.modules.is_empty());
            assert!(!doc.final_summary.is_empty());
            for module in &doc.modules {
                for q in &module.quiz {
                    assert!(is_canonical_answer(&q.answer));
                }
            }
        }
    }

    #[test]
    fn test_empty_modules_synthesize_placeholder() {
        let doc = Normalizer::default().normalize_tolerant(&json!({"title": "Z", "modules": []}));
        assert_eq!(doc.title, "Z");
        assert_eq!(doc.modules.len(), 1);
        assert_eq!(doc.modules[0].module_title, "Introduction");
        assert_eq!(doc.modules[0].introduction, PLACEHOLDER_MODULE_INTRODUCTION);
        assert!(doc.modules[0].lessons.is_empty());
        assert!(doc.modules[0].quiz.is_empty());
    }

    #[test]
    fn test_tolerant_field_defaults() {
        let doc = Normalizer::default().normalize_tolerant(&json!({
            "title": "   ",
            "objectives": ["one", 2, null, true],
            "modules": [
                {"lessons": [{}]},
                {"module_title": "Named", "lessons": [{"lesson_title": "L", "content": "C", "example": null}]}
            ],
            "glossary": [{"term": "T"}, "loose"],
            "final_summary": ""
        }));

        assert_eq!(doc.title, TITLE_PLACEHOLDER);
        assert_eq!(doc.objectives, vec!["one", "2", "true"]);
        assert_eq!(doc.modules[0].module_title, "Module 1");
        assert_eq!(doc.modules[0].introduction, "");
        assert_eq!(doc.modules[0].lessons[0].lesson_title, DEFAULT_LESSON_TITLE);
        assert_eq!(doc.modules[0].lessons[0].content, DEFAULT_LESSON_CONTENT);
        assert_eq!(doc.modules[0].lessons[0].example, "");
        assert_eq!(doc.modules[1].module_title, "Named");
        assert_eq!(doc.glossary[0].definition, "");
        assert_eq!(doc.glossary[1].term, "");
        assert!(doc.study_tips.is_empty());
        assert_eq!(doc.final_summary, SUMMARY_PLACEHOLDER);
    }

    #[test]
    fn test_strict_accepts_complete_course() {
        let doc = validate_strict(&complete_course()).unwrap();
        assert_eq!(doc.modules.len(), 1);
    }

    #[test]
    fn test_strict_rejects_missing_glossary() {
        let mut course = complete_course();
        course.as_object_mut().unwrap().remove("glossary");
        match validate_strict(&course).unwrap_err() {
            CourseError::Validation { field, .. } => assert_eq!(field, "glossary"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_strict_reports_first_failing_field() {
        let mut course = complete_course();
        course["objectives"] = json!([1]);
        course["study_tips"] = json!("oops");
        match validate_strict(&course).unwrap_err() {
            CourseError::Validation { field, .. } => assert_eq!(field, "objectives"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_strict_checks_nested_quiz_shape() {
        let mut course = complete_course();
        course["modules"][0]["quiz"][0]["answer"] = json!("A) Move");
        match validate_strict(&course).unwrap_err() {
            CourseError::Validation { field, detail } => {
                assert_eq!(field, "modules");
                assert!(detail.contains("modules[0].quiz[0].answer"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_strict_rejects_non_object() {
        assert!(validate_strict(&json!([])).is_err());
    }

    #[test]
    fn test_mode_dispatch() {
        let strict = Normalizer::new(NormalizationMode::Strict, QuizResolver::default());
        assert!(strict.normalize(&json!({})).is_err());
        assert!(Normalizer::default().normalize(&json!({})).is_ok());
    }
}
