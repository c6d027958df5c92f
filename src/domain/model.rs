use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDocument {
    pub title: String,
    pub objectives: Vec<String>,
    pub modules: Vec<Module>,
    pub glossary: Vec<GlossaryItem>,
    pub study_tips: Vec<String>,
    pub final_summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub module_title: String,
    pub introduction: String,
    pub lessons: Vec<Lesson>,
    pub quiz: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub lesson_title: String,
    pub content: String,
    #[serde(default)]
    pub example: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Always a single letter `A`-`D` once normalized.
    pub answer: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryItem {
    pub term: String,
    pub definition: String,
}

/// Counts logged after a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CourseStats {
    pub objectives: usize,
    pub modules: usize,
    pub lessons: usize,
    pub questions: usize,
    pub glossary_terms: usize,
    pub study_tips: usize,
}

impl CourseDocument {
    pub fn stats(&self) -> CourseStats {
        CourseStats {
            objectives: self.objectives.len(),
            modules: self.modules.len(),
            lessons: self.modules.iter().map(|m| m.lessons.len()).sum(),
            questions: self.modules.iter().map(|m| m.quiz.len()).sum(),
            glossary_terms: self.glossary.len(),
            study_tips: self.study_tips.len(),
        }
    }
}
