use crate::core::pipeline::CoursePipeline;
use crate::domain::model::CourseDocument;
use crate::domain::ports::{ConfigProvider, ResponseSource};
use crate::utils::error::{CourseError, Result};
use crate::utils::validation::validate_theme;

/// Asks a source for a course and runs the pipeline over each answer,
/// retrying a bounded number of times.
pub struct CourseEngine<S: ResponseSource> {
    source: S,
    pipeline: CoursePipeline,
    attempts: u32,
}

impl<S: ResponseSource> CourseEngine<S> {
    pub fn new(source: S, pipeline: CoursePipeline, attempts: u32) -> Self {
        Self {
            source,
            pipeline,
            attempts,
        }
    }

    pub fn from_config<C: ConfigProvider>(
        source: S,
        pipeline: CoursePipeline,
        config: &C,
    ) -> Self {
        Self::new(source, pipeline, config.attempts())
    }

    pub async fn generate(&self, theme: &str) -> Result<CourseDocument> {
        let theme = validate_theme(theme)?;
        let mut last_error = None;

        for attempt in 1..=self.attempts {
            tracing::info!(attempt, max_attempts = self.attempts, theme, "Requesting course");

            let outcome = match self.source.fetch(theme).await {
                Ok(raw) => self.pipeline.process(&raw),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(document) => {
                    tracing::info!(attempt, "✅ Course generated");
                    return Ok(document);
                }
                Err(e) if e.is_retryable() && attempt < self.attempts => {
                    tracing::warn!(attempt, error = %e, "Attempt failed, retrying");
                    last_error = Some(e);
                }
                Err(e) => {
                    tracing::error!(
                        attempt,
                        error = %e,
                        category = ?e.category(),
                        "❌ Course generation failed"
                    );
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CourseError::ConfigError {
            message: "source.attempts must be at least 1".to_string(),
        }))
    }
}
