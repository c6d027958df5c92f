use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CourseError {
    #[error("Invalid response format: {reason}")]
    Extraction {
        reason: String,
        snippet: Option<String>,
    },

    #[error("Field {field} is missing or invalid: {detail}")]
    Validation { field: String, detail: String },

    #[error("Invalid response format: wrapper nesting exceeded depth {depth}")]
    UnwrapDepthExceeded { depth: usize },

    #[error("Empty response from generator")]
    EmptyResponse,

    #[error("Invalid theme: {message}")]
    InvalidTheme { message: String },

    #[error("Network request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Generator returned {status}: {message}")]
    ApiStatus { status: u16, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Format,
    Validation,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// Body returned to callers when a request fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl CourseError {
    pub fn extraction(reason: impl Into<String>) -> Self {
        CourseError::Extraction {
            reason: reason.into(),
            snippet: None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            CourseError::InvalidTheme { .. } => ErrorCategory::Input,
            CourseError::ApiError(_) | CourseError::ApiStatus { .. } => ErrorCategory::Network,
            CourseError::Extraction { .. }
            | CourseError::UnwrapDepthExceeded { .. }
            | CourseError::EmptyResponse
            | CourseError::SerializationError(_) => ErrorCategory::Format,
            CourseError::Validation { .. } => ErrorCategory::Validation,
            CourseError::ConfigError { .. }
            | CourseError::ConfigValidationError { .. }
            | CourseError::InvalidConfigValueError { .. }
            | CourseError::MissingConfigError { .. } => ErrorCategory::Configuration,
            CourseError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Format | ErrorCategory::Validation => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Status mirrored to the HTTP layer: caller mistakes are 400, everything else 500.
    pub fn http_status(&self) -> u16 {
        match self.category() {
            ErrorCategory::Input => 400,
            _ => 500,
        }
    }

    /// Whether another generation attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Network | ErrorCategory::Format | ErrorCategory::Validation
        )
    }

    pub fn user_friendly_message(&self) -> String {
        let raw = self.to_string().to_lowercase();

        if raw.contains("empty") || raw.contains("json") || raw.contains("response format") {
            "We could not build a course for this theme. Try different keywords or be more specific."
                .to_string()
        } else if raw.contains("generator returned") || raw.contains("invalid") {
            "There was a problem talking to the course generator. Please try again in a few seconds."
                .to_string()
        } else if raw.contains("network") || raw.contains("connect") || raw.contains("timed out") {
            "Check your internet connection and try again.".to_string()
        } else {
            "An unexpected error occurred. Please try again.".to_string()
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CourseError::Extraction { snippet: Some(s), .. } => {
                format!("Inspect the start of the generator output: {}", s)
            }
            CourseError::Extraction { .. }
            | CourseError::UnwrapDepthExceeded { .. }
            | CourseError::EmptyResponse => {
                "Retry the generation or switch to a more specific theme".to_string()
            }
            CourseError::Validation { field, .. } => format!(
                "Check the '{}' field of the generator output, or run in tolerant mode",
                field
            ),
            CourseError::InvalidTheme { .. } => "Provide a non-empty theme".to_string(),
            CourseError::ApiError(_) => {
                "Check network connectivity and the webhook endpoint".to_string()
            }
            CourseError::ApiStatus { status, .. } => {
                format!("The generator answered with HTTP {}; retry later", status)
            }
            CourseError::IoError(_) => "Check file paths and permissions".to_string(),
            CourseError::SerializationError(_) => {
                "The document could not be serialized; report this as a bug".to_string()
            }
            CourseError::ConfigError { .. }
            | CourseError::ConfigValidationError { .. }
            | CourseError::InvalidConfigValueError { .. }
            | CourseError::MissingConfigError { .. } => {
                "Review the configuration file and command line flags".to_string()
            }
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CourseError>;
