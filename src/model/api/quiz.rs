use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    api::question::QuestionDescription,
    common::{QuestionId, ALL_CATEGORIES},
    db::Question,
    quiz::{CategoryFilter, QuizOutcome},
};

/// Body of `POST /quizzes`.
///
/// The server keeps no quiz state: the caller resends every question it has
/// already been given on each request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRequest {
    #[serde(default)]
    pub previous_questions: HashSet<QuestionId>,
    #[serde(default)]
    pub quiz_category: Option<QuizCategory>,
}

/// The category a quiz draws from, as sent by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizCategory {
    #[serde(default)]
    pub id: Option<RawCategoryId>,
    /// Display name; informational only.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Callers send category IDs both as numbers and as strings, with `""`
/// meaning no category has been chosen yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCategoryId {
    Number(i64),
    Text(String),
}

impl QuizRequest {
    pub fn new(previous_questions: impl IntoIterator<Item = QuestionId>, id: RawCategoryId) -> Self {
        Self {
            previous_questions: previous_questions.into_iter().collect(),
            quiz_category: Some(QuizCategory {
                id: Some(id),
                name: None,
            }),
        }
    }

    /// Resolve the requested category into a filter for the question pool.
    ///
    /// A missing category is a bad request; one that is present but empty or
    /// not a valid ID is unprocessable.
    pub fn category_filter(&self) -> Result<CategoryFilter> {
        let raw = self
            .quiz_category
            .as_ref()
            .ok_or_else(|| Error::bad_request("quiz_category is required"))?
            .id
            .as_ref()
            .ok_or_else(|| Error::bad_request("quiz_category.id is required"))?;

        let id = match raw {
            RawCategoryId::Text(text) if text.trim().is_empty() => {
                return Err(Error::unprocessable("No quiz category chosen"));
            }
            RawCategoryId::Text(text) => text.trim().parse::<u32>().ok(),
            RawCategoryId::Number(number) => u32::try_from(*number).ok(),
        }
        .ok_or_else(|| Error::unprocessable(format!("Invalid quiz category ID {raw:?}")))?;

        Ok(match id {
            ALL_CATEGORIES => CategoryFilter::All,
            id => CategoryFilter::Only(id),
        })
    }
}

/// Response to `POST /quizzes`: `{"success": true, "question": {...}}` when a
/// question was found, `{"success": false, "question": false}` once the pool
/// is exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResponse {
    pub success: bool,
    #[serde(with = "question_or_false")]
    pub question: Option<QuestionDescription>,
}

impl From<QuizOutcome<Question>> for QuizResponse {
    fn from(outcome: QuizOutcome<Question>) -> Self {
        match outcome {
            QuizOutcome::Found(question) => Self {
                success: true,
                question: Some(question.into()),
            },
            QuizOutcome::Exhausted => Self {
                success: false,
                question: None,
            },
        }
    }
}

/// (De)serialise an optional question as either the question or `false`.
mod question_or_false {
    use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

    use super::QuestionDescription;

    pub fn serialize<S: Serializer>(
        question: &Option<QuestionDescription>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match question {
            Some(question) => question.serialize(serializer),
            None => serializer.serialize_bool(false),
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Question(QuestionDescription),
        Flag(bool),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<QuestionDescription>, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Question(question) => Ok(Some(question)),
            Repr::Flag(false) => Ok(None),
            Repr::Flag(true) => Err(D::Error::custom("expected a question or `false`")),
        }
    }
}
