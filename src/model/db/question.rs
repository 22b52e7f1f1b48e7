use std::ops::Deref;

use log::debug;
use mongodb::{
    bson::{doc, Document},
    error::Error as DbError,
    options::FindOptions,
    Client,
};
use rocket::futures::TryStreamExt;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    common::{CategoryId, QuestionId, DIFFICULTY_RANGE},
    db::Category,
    mongodb::{should_retry, Coll, Counter, QUESTION_ID_COUNTER_ID},
};

/// Core question data, as supplied by its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCore {
    /// Question text.
    pub question: String,
    /// Answer text.
    pub answer: String,
    /// The category this question belongs to.
    pub category: CategoryId,
    /// Difficulty, within [`DIFFICULTY_RANGE`].
    pub difficulty: u8,
}

impl QuestionCore {
    /// Check the parts of a question that can be checked without the database.
    pub fn validate(&self) -> Result<()> {
        if self.question.trim().is_empty() {
            return Err(Error::unprocessable("Question text must not be empty"));
        }
        if self.answer.trim().is_empty() {
            return Err(Error::unprocessable("Answer text must not be empty"));
        }
        if !DIFFICULTY_RANGE.contains(&self.difficulty) {
            return Err(Error::unprocessable(format!(
                "Difficulty {} is outside {}..={}",
                self.difficulty,
                DIFFICULTY_RANGE.start(),
                DIFFICULTY_RANGE.end()
            )));
        }
        Ok(())
    }
}

/// A question from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "_id")]
    pub id: QuestionId,
    #[serde(flatten)]
    pub content: QuestionCore,
}

impl Question {
    /// Allocate an ID for the given question and insert it.
    ///
    /// The category is not checked; callers must ensure it exists.
    pub async fn insert(
        content: QuestionCore,
        questions: &Coll<Question>,
        counters: &Coll<Counter>,
    ) -> Result<Self> {
        content.validate()?;
        let id = Counter::next(counters, QUESTION_ID_COUNTER_ID).await?;
        let question = Self { id, content };
        questions.insert_one(&question, None).await?;
        Ok(question)
    }

    /// Allocate an ID for the given question and insert it, failing with a
    /// `422` if its category doesn't exist.
    ///
    /// The category is marked with the new question's ID in the same
    /// transaction as the insert, so a concurrent deletion of the category
    /// conflicts with it and one of the two is retried. A question can never
    /// be left behind in a deleted category.
    pub async fn insert_in_category(
        content: QuestionCore,
        questions: &Coll<Question>,
        categories: &Coll<Category>,
        counters: &Coll<Counter>,
        db_client: &Client,
    ) -> Result<Self> {
        content.validate()?;
        let id = Counter::next(counters, QUESTION_ID_COUNTER_ID).await?;
        let question = Self { id, content };

        let mut attempt = 1;
        loop {
            match question
                .try_insert_in_category(questions, categories, db_client)
                .await
            {
                Err(err) if should_retry(&err, attempt, "insert a question") => attempt += 1,
                result => return result.map(|()| question),
            }
        }
    }

    async fn try_insert_in_category(
        &self,
        questions: &Coll<Question>,
        categories: &Coll<Category>,
        db_client: &Client,
    ) -> Result<()> {
        let mut session = db_client.start_session(None).await?;
        session.start_transaction(None).await?;

        let category = categories
            .find_one_and_update_with_session(
                doc! { "_id": self.category },
                doc! { "$set": { "latest_question": self.id } },
                None,
                &mut session,
            )
            .await?;
        if category.is_none() {
            session.abort_transaction().await?;
            return Err(Error::unprocessable(format!(
                "Category {} does not exist",
                self.category
            )));
        }
        questions
            .insert_one_with_session(self, None, &mut session)
            .await?;

        session.commit_transaction().await?;
        debug!("Inserted question {} into category {}", self.id, self.category);
        Ok(())
    }

    /// Every question, ordered by ID.
    pub async fn all(questions: &Coll<Question>) -> std::result::Result<Vec<Self>, DbError> {
        Self::find_ordered(questions, doc! {}).await
    }

    /// Every question in the given category, ordered by ID.
    pub async fn in_category(
        questions: &Coll<Question>,
        category: CategoryId,
    ) -> std::result::Result<Vec<Self>, DbError> {
        Self::find_ordered(questions, doc! { "category": category }).await
    }

    /// Every question whose text contains `term`, ignoring case, ordered by ID.
    pub async fn matching(
        questions: &Coll<Question>,
        term: &str,
    ) -> std::result::Result<Vec<Self>, DbError> {
        let filter = doc! {
            "question": {
                "$regex": regex::escape(term),
                "$options": "i",
            }
        };
        Self::find_ordered(questions, filter).await
    }

    async fn find_ordered(
        questions: &Coll<Question>,
        filter: Document,
    ) -> std::result::Result<Vec<Self>, DbError> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        questions.find(filter, options).await?.try_collect().await
    }
}

impl Deref for Question {
    type Target = QuestionCore;

    fn deref(&self) -> &Self::Target {
        &self.content
    }
}
