use log::{debug, info};
use rocket::{serde::json::Json, Route};

use crate::error::Result;
use crate::logging::RequestId;
use crate::model::{
    api::quiz::{QuizRequest, QuizResponse},
    db::Question,
    mongodb::Coll,
    quiz::{next_question, QuizOutcome},
};

pub fn routes() -> Vec<Route> {
    routes![next_quiz_question]
}

/// Draw a question the caller hasn't seen yet from the requested category.
/// Running out of questions is a normal `200` response, not an error.
#[post("/quizzes", data = "<request>")]
async fn next_quiz_question(
    id: &RequestId,
    request: Json<QuizRequest>,
    questions: Coll<Question>,
) -> Result<Json<QuizResponse>> {
    let outcome = next_question(&questions, &request).await?;
    match &outcome {
        QuizOutcome::Found(question) => debug!("req{id} drew question {}", question.id),
        QuizOutcome::Exhausted => info!(
            "req{id} quiz exhausted after {} questions",
            request.previous_questions.len()
        ),
    }
    Ok(Json(outcome.into()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use mongodb::Database;
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::Client,
        serde::json::{serde_json::json, Value},
    };

    use crate::api::fixtures::{body, insert_trivia};
    use crate::error::ErrorBody;

    use super::*;

    async fn quiz(client: &Client, request: Value) -> (Status, Value) {
        let response = client
            .post("/api/quizzes")
            .header(ContentType::JSON)
            .body(request.to_string())
            .dispatch()
            .await;
        (response.status(), body(response).await)
    }

    #[backend_test]
    async fn random_question_from_category(client: Client, db: Database) {
        let trivia = insert_trivia(&db).await;

        let (status, value) = quiz(
            &client,
            json!({
                "previous_questions": [],
                "quiz_category": {"type": "Science", "id": trivia.science.to_string()},
            }),
        )
        .await;
        assert_eq!(Status::Ok, status);
        let response: QuizResponse = rocket::serde::json::serde_json::from_value(value).unwrap();
        assert!(response.success);
        let question = response.question.unwrap();
        assert!(trivia.science_questions.contains(&question.id));
        assert_eq!(question.content.category, trivia.science);
    }

    #[backend_test]
    async fn last_unseen_question(client: Client, db: Database) {
        let trivia = insert_trivia(&db).await;
        let seen = &trivia.science_questions[..2];

        let (status, value) = quiz(
            &client,
            json!({
                "previous_questions": seen,
                "quiz_category": {"type": "Science", "id": trivia.science},
            }),
        )
        .await;
        assert_eq!(Status::Ok, status);
        assert_eq!(value["success"], true);
        assert_eq!(value["question"]["id"], trivia.science_questions[2]);
        assert_eq!(value["question"]["answer"], "Apollo 13");
    }

    #[backend_test]
    async fn category_exhausted(client: Client, db: Database) {
        let trivia = insert_trivia(&db).await;

        let (status, value) = quiz(
            &client,
            json!({
                "previous_questions": trivia.science_questions,
                "quiz_category": {"type": "Science", "id": trivia.science},
            }),
        )
        .await;
        assert_eq!(Status::Ok, status);
        assert_eq!(value, json!({"success": false, "question": false}));
    }

    #[backend_test]
    async fn play_all_categories(client: Client, db: Database) {
        let trivia = insert_trivia(&db).await;
        let every_question = trivia
            .science_questions
            .iter()
            .chain(&trivia.art_questions)
            .copied()
            .collect::<HashSet<_>>();

        // Keep asking until the pool runs out, like the frontend does.
        let mut seen = Vec::new();
        loop {
            let (status, value) = quiz(
                &client,
                json!({
                    "previous_questions": seen,
                    "quiz_category": {"type": "click", "id": 0},
                }),
            )
            .await;
            assert_eq!(Status::Ok, status);
            if value["success"] == false {
                break;
            }
            let id = value["question"]["id"].as_u64().unwrap() as u32;
            assert!(!seen.contains(&id));
            seen.push(id);
        }
        assert_eq!(seen.into_iter().collect::<HashSet<_>>(), every_question);
    }

    #[backend_test]
    async fn stale_previous_questions(client: Client, db: Database) {
        let trivia = insert_trivia(&db).await;

        // Delete a question the caller has already seen.
        let deleted = trivia.art_questions[0];
        let response = client
            .delete(format!("/api/questions/{deleted}"))
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());

        let mut seen = trivia.science_questions[..2].to_vec();
        seen.push(deleted);
        let (status, value) = quiz(
            &client,
            json!({
                "previous_questions": seen,
                "quiz_category": {"id": 0},
            }),
        )
        .await;
        assert_eq!(Status::Ok, status);
        assert_eq!(value["question"]["id"], trivia.science_questions[2]);
    }

    #[backend_test]
    async fn without_category_id(client: Client, db: Database) {
        insert_trivia(&db).await;

        let (status, value) = quiz(
            &client,
            json!({
                "previous_questions": [],
                "quiz_category": {"type": "Science", "id": ""},
            }),
        )
        .await;
        assert_eq!(Status::UnprocessableEntity, status);
        let error: ErrorBody = rocket::serde::json::serde_json::from_value(value).unwrap();
        assert!(!error.success);
        assert_eq!(error.error, 422);

        let (status, _) = quiz(&client, json!({ "previous_questions": [] })).await;
        assert_eq!(Status::BadRequest, status);
    }

    #[backend_test]
    async fn malformed_body(client: Client) {
        // Not JSON.
        let response = client
            .post("/api/quizzes")
            .header(ContentType::JSON)
            .body("{\"previous_questions\": [1, 2")
            .dispatch()
            .await;
        assert_eq!(Status::BadRequest, response.status());

        // JSON of the wrong shape.
        let (status, value) = quiz(
            &client,
            json!({
                "previous_questions": ["one"],
                "quiz_category": {"id": 0},
            }),
        )
        .await;
        assert_eq!(Status::UnprocessableEntity, status);
        assert_eq!(value["message"], "unprocessable");
    }
}
