use log::debug;
use mongodb::{bson::doc, error::Error as DbError, options::FindOptions, Client};
use rocket::futures::TryStreamExt;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    common::CategoryId,
    db::Question,
    mongodb::{should_retry, Coll, Counter, CATEGORY_ID_COUNTER_ID},
};

/// A question category from the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    /// Display name. Not required to be unique.
    #[serde(rename = "type")]
    pub name: String,
}

impl Category {
    /// Allocate an ID for a category with the given name and insert it.
    pub async fn insert(
        name: String,
        categories: &Coll<Category>,
        counters: &Coll<Counter>,
    ) -> Result<Self> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(Error::unprocessable("Category name must not be empty"));
        }
        let id = Counter::next(counters, CATEGORY_ID_COUNTER_ID).await?;
        let category = Self { id, name };
        categories.insert_one(&category, None).await?;
        Ok(category)
    }

    /// Look up a single category.
    pub async fn find(
        categories: &Coll<Category>,
        id: CategoryId,
    ) -> std::result::Result<Option<Self>, DbError> {
        categories.find_one(doc! { "_id": id }, None).await
    }

    /// Delete a category and every question in it, atomically. Returns how
    /// many questions were deleted.
    pub async fn delete_with_questions(
        id: CategoryId,
        categories: &Coll<Category>,
        questions: &Coll<Question>,
        db_client: &Client,
    ) -> Result<u64> {
        let mut attempt = 1;
        loop {
            match Self::try_delete_with_questions(id, categories, questions, db_client).await {
                Err(err) if should_retry(&err, attempt, "delete a category") => attempt += 1,
                result => return result,
            }
        }
    }

    async fn try_delete_with_questions(
        id: CategoryId,
        categories: &Coll<Category>,
        questions: &Coll<Question>,
        db_client: &Client,
    ) -> Result<u64> {
        let mut session = db_client.start_session(None).await?;
        session.start_transaction(None).await?;

        let result = categories
            .delete_one_with_session(doc! { "_id": id }, None, &mut session)
            .await?;
        if result.deleted_count == 0 {
            session.abort_transaction().await?;
            return Err(Error::not_found(format!("Category {}", id)));
        }
        let removed = questions
            .delete_many_with_session(doc! { "category": id }, None, &mut session)
            .await?;

        session.commit_transaction().await?;
        debug!("Deleted category {} with {} questions", id, removed.deleted_count);
        Ok(removed.deleted_count)
    }

    /// Every category, ordered by ID.
    pub async fn all(categories: &Coll<Category>) -> std::result::Result<Vec<Self>, DbError> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        categories.find(None, options).await?.try_collect().await
    }
}
