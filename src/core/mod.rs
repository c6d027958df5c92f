pub mod engine;
pub mod extractor;
pub mod normalizer;
pub mod pipeline;
pub mod quiz;
pub mod sanitizer;
pub mod unwrapper;

pub use crate::domain::model::{CourseDocument, GlossaryItem, Lesson, Module, QuizQuestion};
pub use crate::domain::ports::{ConfigProvider, ResponseSource};
pub use crate::utils::error::Result;
