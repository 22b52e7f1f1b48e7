use log::info;
use mongodb::{bson::doc, options::FindOptions, Client};
use rocket::{futures::TryStreamExt, serde::json::Json, Route, State};

use crate::error::{Error, Result};
use crate::model::{
    api::{
        category::category_map,
        pagination::Pagination,
        question::{
            Deleted, QuestionCreated, QuestionList, QuestionPage, QuestionSpec, SearchRequest,
        },
        Success,
    },
    common::QuestionId,
    db::{Category, Question},
    mongodb::{Coll, Counter},
};
use crate::Config;

pub fn routes() -> Vec<Route> {
    routes![
        list_questions,
        create_question,
        delete_question,
        search_questions,
    ]
}

#[get("/questions")]
async fn list_questions(
    pagination: Pagination,
    questions: Coll<Question>,
    categories: Coll<Category>,
) -> Result<Json<Success<QuestionPage>>> {
    let categories = Category::all(&categories).await?;
    if categories.is_empty() {
        return Err(Error::not_found("Categories".to_string()));
    }

    let total_questions = questions.count_documents(None, None).await?;
    if !pagination.in_range(total_questions) {
        return Err(Error::unprocessable(format!(
            "Page {} is beyond the last page",
            pagination.page_num()
        )));
    }
    let page = question_page(&questions, &pagination).await?;

    Ok(Json(Success::new(QuestionPage {
        questions: page.into_iter().map(Into::into).collect(),
        total_questions,
        categories: category_map(categories),
        current_category: None,
    })))
}

#[post("/questions/new-question", data = "<spec>")]
async fn create_question(
    spec: Json<QuestionSpec>,
    questions: Coll<Question>,
    categories: Coll<Category>,
    counters: Coll<Counter>,
    config: &State<Config>,
    db_client: &State<Client>,
) -> Result<Json<Success<QuestionCreated>>> {
    let question = Question::insert_in_category(
        spec.into_inner(),
        &questions,
        &categories,
        &counters,
        db_client,
    )
    .await?;
    info!("Created question {} in category {}", question.id, question.category);

    let total_questions = questions.count_documents(None, None).await?;
    let first_page = Pagination::new(1, config.questions_per_page());
    let page = question_page(&questions, &first_page).await?;

    Ok(Json(Success::new(QuestionCreated {
        created: question.id,
        questions: page.into_iter().map(Into::into).collect(),
        total_questions,
    })))
}

#[delete("/questions/<question_id>")]
async fn delete_question(
    question_id: QuestionId,
    questions: Coll<Question>,
) -> Result<Json<Success<Deleted>>> {
    let result = questions.delete_one(doc! { "_id": question_id }, None).await?;
    if result.deleted_count == 0 {
        return Err(Error::unprocessable(format!(
            "Question {} does not exist",
            question_id
        )));
    }
    info!("Deleted question {}", question_id);
    Ok(Json(Success::new(Deleted {
        deleted: question_id,
    })))
}

#[post("/questions/search", data = "<request>")]
async fn search_questions(
    request: Json<SearchRequest>,
    questions: Coll<Question>,
) -> Result<Json<Success<QuestionList>>> {
    let term = request
        .search_term
        .as_deref()
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .ok_or_else(|| Error::bad_request("searchTerm is required"))?;

    let found = Question::matching(&questions, term).await?;
    if found.is_empty() {
        return Err(Error::not_found(format!("Questions matching {:?}", term)));
    }
    Ok(Json(Success::new(QuestionList::new(found, None))))
}

/// One page of questions, ordered by ID.
async fn question_page(questions: &Coll<Question>, pagination: &Pagination) -> Result<Vec<Question>> {
    let options = FindOptions::builder()
        .sort(doc! { "_id": 1 })
        .skip(pagination.skip())
        .limit(i64::from(pagination.page_size()))
        .build();
    let page = questions.find(None, options).await?.try_collect().await?;
    Ok(page)
}
