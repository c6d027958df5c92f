use crate::core::normalizer::{NormalizationMode, Normalizer};
use crate::core::pipeline::{CoursePipeline, DEFAULT_MAX_UNWRAP_DEPTH};
use crate::core::quiz::QuizResolver;
use crate::core::ConfigProvider;
use crate::utils::error::{CourseError, Result};
use crate::utils::validation::{validate_range, validate_url, Validate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

static ENV_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    pub normalization: NormalizationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub attempts: u32,
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    pub mode: NormalizationMode,
    pub relabel_options: bool,
    pub max_unwrap_depth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub pretty: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name: "mini-course".to_string(),
            description: "Recover mini-courses from generator output".to_string(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5678/webhook/mini-course".to_string(),
            timeout_seconds: 180,
            attempts: 2,
            headers: HashMap::new(),
        }
    }
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            mode: NormalizationMode::Tolerant,
            relabel_options: true,
            max_unwrap_depth: DEFAULT_MAX_UNWRAP_DEPTH,
        }
    }
}

impl NormalizationConfig {
    pub fn build_pipeline(&self) -> CoursePipeline {
        let normalizer = Normalizer::new(self.mode, QuizResolver::new(self.relabel_options));
        CoursePipeline::new(normalizer, self.max_unwrap_depth)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl CourseConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CourseError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${WEBHOOK_TOKEN})
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("source.endpoint", &self.source.endpoint)?;
        validate_range("source.attempts", self.source.attempts, 1, 10)?;
        validate_range("source.timeout_seconds", self.source.timeout_seconds, 1, 600)?;
        validate_range(
            "normalization.max_unwrap_depth",
            self.normalization.max_unwrap_depth,
            1,
            8,
        )?;
        Ok(())
    }
}

impl ConfigProvider for CourseConfig {
    fn endpoint(&self) -> &str {
        &self.source.endpoint
    }

    fn timeout_seconds(&self) -> u64 {
        self.source.timeout_seconds
    }

    fn attempts(&self) -> u32 {
        self.source.attempts
    }

    fn headers(&self) -> &HashMap<String, String> {
        &self.source.headers
    }
}

impl Validate for CourseConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
