pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, Command};

pub use crate::adapters::{FileSource, WebhookSource};
pub use crate::config::CourseConfig;
pub use crate::core::{
    engine::CourseEngine,
    normalizer::{NormalizationMode, Normalizer},
    pipeline::CoursePipeline,
};
pub use crate::domain::model::CourseDocument;
pub use crate::utils::error::{CourseError, Result};
