use crate::core::extractor::Extractor;
use crate::core::normalizer::{NormalizationMode, Normalizer};
use crate::core::quiz::QuizResolver;
use crate::core::unwrapper::{unwrap, Payload};
use crate::domain::model::CourseDocument;
use crate::utils::error::{CourseError, Result};
use serde_json::Value;

pub const DEFAULT_MAX_UNWRAP_DEPTH: usize = 2;

/// Where a single recovery run currently stands.
#[derive(Debug)]
enum Stage {
    RawText(String),
    Parsed(Value),
    Document(CourseDocument),
    Failed(CourseError),
}

/// Raw generator output in, validated course out.
///
/// Each call to [`CoursePipeline::process`] is independent: the pipeline
/// holds only immutable settings and can be shared across tasks.
#[derive(Debug, Clone)]
pub struct CoursePipeline {
    extractor: Extractor,
    normalizer: Normalizer,
    max_unwrap_depth: usize,
}

impl Default for CoursePipeline {
    fn default() -> Self {
        Self::new(Normalizer::default(), DEFAULT_MAX_UNWRAP_DEPTH)
    }
}

impl CoursePipeline {
    pub fn new(normalizer: Normalizer, max_unwrap_depth: usize) -> Self {
        Self {
            extractor: Extractor::new(),
            normalizer,
            max_unwrap_depth,
        }
    }

    pub fn with_mode(mode: NormalizationMode) -> Self {
        Self::new(
            Normalizer::new(mode, QuizResolver::default()),
            DEFAULT_MAX_UNWRAP_DEPTH,
        )
    }

    pub fn mode(&self) -> NormalizationMode {
        self.normalizer.mode()
    }

    pub fn process(&self, raw: &str) -> Result<CourseDocument> {
        let span = tracing::info_span!(
            "course_pipeline",
            mode = %self.normalizer.mode(),
            input_len = raw.len()
        );
        let _enter = span.enter();

        if raw.trim().is_empty() {
            tracing::warn!("Received blank response");
            return Err(CourseError::EmptyResponse);
        }

        let mut depth = 0;
        let mut stage = Stage::RawText(raw.to_string());

        loop {
            stage = match stage {
                Stage::RawText(text) => match self.extractor.extract_value(&text) {
                    Ok(value) => Stage::Parsed(value),
                    Err(e) => Stage::Failed(e),
                },
                Stage::Parsed(value) => match unwrap(value) {
                    Payload::Text(text) => {
                        depth += 1;
                        if depth > self.max_unwrap_depth {
                            tracing::warn!(depth, "Wrapper nesting too deep");
                            Stage::Failed(CourseError::UnwrapDepthExceeded {
                                depth: self.max_unwrap_depth,
                            })
                        } else {
                            tracing::debug!(depth, "Payload is text, extracting again");
                            Stage::RawText(text)
                        }
                    }
                    Payload::Value(value) => match self.normalizer.normalize(&value) {
                        Ok(document) => Stage::Document(document),
                        Err(e) => Stage::Failed(e),
                    },
                },
                Stage::Document(document) => {
                    let stats = document.stats();
                    tracing::info!(
                        title = %document.title,
                        modules = stats.modules,
                        lessons = stats.lessons,
                        questions = stats.questions,
                        glossary_terms = stats.glossary_terms,
                        study_tips = stats.study_tips,
                        "Course recovered"
                    );
                    return Ok(document);
                }
                Stage::Failed(e) => {
                    tracing::debug!(error = %e, "Pipeline failed");
                    return Err(e);
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_array_output_wrapper() {
        let raw = r#"[{"output": "{\"title\":\"Y\",\"modules\":[]}"}]"#;
        let doc = CoursePipeline::default().process(raw).unwrap();
        assert_eq!(doc.title, "Y");
        assert_eq!(doc.modules.len(), 1);
        assert_eq!(doc.modules[0].module_title, "Introduction");
    }

    #[test]
    fn test_process_output_with_fenced_markdown() {
        let raw = serde_json::json!({
            "output": "Sure! Here is your course:\n```json\n{\"title\": \"Fenced\", \"modules\": [{\"module_title\": \"M1\", \"quiz\": [{\"question\": \"Q\", \"options\": [\"Yes\", \"No\"], \"answer\": \"b) No\"}]}],}\n```"
        })
        .to_string();

        let doc = CoursePipeline::default().process(&raw).unwrap();
        assert_eq!(doc.title, "Fenced");
        let question = &doc.modules[0].quiz[0];
        assert_eq!(question.options, vec!["A) Yes", "B) No"]);
        assert_eq!(question.answer, "B");
    }

    #[test]
    fn test_process_object_output_value() {
        let raw = r#"{"output": {"title": "Inline", "modules": []}}"#;
        let doc = CoursePipeline::default().process(raw).unwrap();
        assert_eq!(doc.title, "Inline");
    }

    #[test]
    fn test_process_blank_input() {
        let err = CoursePipeline::default().process("  \n ").unwrap_err();
        assert!(matches!(err, CourseError::EmptyResponse));
    }

    #[test]
    fn test_process_depth_is_bounded() {
        let level3 = serde_json::json!({"title": "deep", "modules": []}).to_string();
        let level2 = serde_json::json!({ "output": level3 }).to_string();
        let level1 = serde_json::json!({ "output": level2 }).to_string();
        let raw = serde_json::json!([{ "output": level1 }]).to_string();

        let err = CoursePipeline::default().process(&raw).unwrap_err();
        assert!(matches!(err, CourseError::UnwrapDepthExceeded { depth: 2 }));

        let deeper = CoursePipeline::new(Normalizer::default(), 3);
        assert_eq!(deeper.process(&raw).unwrap().title, "deep");
    }

    #[test]
    fn test_process_strict_mode_rejects() {
        let pipeline = CoursePipeline::with_mode(NormalizationMode::Strict);
        let err = pipeline
            .process(r#"{"title": "T", "modules": []}"#)
            .unwrap_err();
        match err {
            CourseError::Validation { field, .. } => assert_eq!(field, "objectives"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_process_blank_output_wrapper_fails_extraction() {
        for raw in [r#"{"output": ""}"#, r#"[{"output": "   "}]"#] {
            let err = CoursePipeline::default().process(raw).unwrap_err();
            assert!(
                matches!(err, CourseError::Extraction { .. }),
                "input {raw:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_process_unparseable_text() {
        let err = CoursePipeline::default()
            .process("The model is overloaded, try again later.")
            .unwrap_err();
        assert!(matches!(err, CourseError::Extraction { .. }));
    }
}
