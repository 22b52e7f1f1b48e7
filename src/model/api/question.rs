use serde::{Deserialize, Serialize};

use crate::model::{
    api::category::CategoryMap,
    common::{CategoryId, QuestionId},
    db::{Question, QuestionCore},
};

/// A question, as submitted for creation.
pub type QuestionSpec = QuestionCore;

/// A question, as returned to the caller:
/// `{id, question, answer, category, difficulty}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDescription {
    pub id: QuestionId,
    #[serde(flatten)]
    pub content: QuestionCore,
}

impl From<Question> for QuestionDescription {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            content: question.content,
        }
    }
}

/// A list of questions, optionally within a named category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionList {
    pub questions: Vec<QuestionDescription>,
    pub total_questions: u64,
    pub current_category: Option<String>,
}

impl QuestionList {
    /// List every question given, with the given category as current.
    pub fn new(questions: Vec<Question>, current_category: Option<String>) -> Self {
        Self {
            total_questions: questions.len() as u64,
            questions: questions.into_iter().map(Into::into).collect(),
            current_category,
        }
    }
}

/// One page of every question, alongside every category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPage {
    pub questions: Vec<QuestionDescription>,
    pub total_questions: u64,
    pub categories: CategoryMap,
    pub current_category: Option<String>,
}

/// Body of a question search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "searchTerm", default)]
    pub search_term: Option<String>,
}

/// Response to creating a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCreated {
    pub created: QuestionId,
    pub questions: Vec<QuestionDescription>,
    pub total_questions: u64,
}

/// Response to deleting a question or category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    pub deleted: u32,
}
