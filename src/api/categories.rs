use log::info;
use mongodb::Client;
use rocket::{serde::json::Json, Route, State};

use crate::error::{Error, Result};
use crate::model::{
    api::{
        category::{category_map, CategoryCreated, CategoryListing, CategorySpec},
        question::{Deleted, QuestionList},
        Success,
    },
    common::CategoryId,
    db::{Category, Question},
    mongodb::{Coll, Counter},
};

pub fn routes() -> Vec<Route> {
    routes![
        list_categories,
        category_questions,
        create_category,
        delete_category,
    ]
}

#[get("/categories")]
async fn list_categories(categories: Coll<Category>) -> Result<Json<Success<CategoryListing>>> {
    let categories = Category::all(&categories).await?;
    Ok(Json(Success::new(CategoryListing {
        categories: category_map(categories),
    })))
}

#[get("/categories/<category_id>/questions")]
async fn category_questions(
    category_id: CategoryId,
    categories: Coll<Category>,
    questions: Coll<Question>,
) -> Result<Json<Success<QuestionList>>> {
    let category = Category::find(&categories, category_id)
        .await?
        .ok_or_else(|| Error::not_found(format!("Category {}", category_id)))?;

    let in_category = Question::in_category(&questions, category_id).await?;
    if in_category.is_empty() {
        return Err(Error::not_found(format!(
            "Questions in category {}",
            category_id
        )));
    }
    Ok(Json(Success::new(QuestionList::new(
        in_category,
        Some(category.name),
    ))))
}

#[post("/categories/new-category", data = "<spec>")]
async fn create_category(
    spec: Json<CategorySpec>,
    categories: Coll<Category>,
    counters: Coll<Counter>,
) -> Result<Json<Success<CategoryCreated>>> {
    let category = Category::insert(spec.into_inner().category, &categories, &counters).await?;
    info!("Created category {} ({})", category.id, category.name);

    let all = Category::all(&categories).await?;
    Ok(Json(Success::new(CategoryCreated {
        created: category.id,
        categories: all.into_iter().map(Into::into).collect(),
    })))
}

#[delete("/categories/<category_id>")]
async fn delete_category(
    category_id: CategoryId,
    categories: Coll<Category>,
    questions: Coll<Question>,
    db_client: &State<Client>,
) -> Result<Json<Success<Deleted>>> {
    let removed =
        Category::delete_with_questions(category_id, &categories, &questions, db_client).await?;
    info!("Deleted category {} and its {} questions", category_id, removed);

    Ok(Json(Success::new(Deleted {
        deleted: category_id,
    })))
}
