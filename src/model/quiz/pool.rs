use log::{debug, error};
use mongodb::error::Error as DbError;

use crate::error::{Error, Result};
use crate::model::{
    api::quiz::QuizRequest,
    common::CategoryId,
    db::Question,
    mongodb::Coll,
};

use super::selector::{select_next, QuizOutcome};

/// Where quiz questions are read from.
#[rocket::async_trait]
pub trait QuestionPool {
    /// Every question.
    async fn all_questions(&self) -> std::result::Result<Vec<Question>, DbError>;

    /// Every question in the given category.
    async fn questions_in(
        &self,
        category: CategoryId,
    ) -> std::result::Result<Vec<Question>, DbError>;
}

#[rocket::async_trait]
impl QuestionPool for Coll<Question> {
    async fn all_questions(&self) -> std::result::Result<Vec<Question>, DbError> {
        Question::all(self).await
    }

    async fn questions_in(
        &self,
        category: CategoryId,
    ) -> std::result::Result<Vec<Question>, DbError> {
        Question::in_category(self, category).await
    }
}

/// Which questions a quiz draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(CategoryId),
}

impl CategoryFilter {
    /// Read the current pool for this filter. Never cached: each quiz request
    /// sees the questions as they are now.
    pub async fn load<P>(self, store: &P) -> std::result::Result<Vec<Question>, DbError>
    where
        P: QuestionPool + Sync + ?Sized,
    {
        match self {
            Self::All => store.all_questions().await,
            Self::Only(category) => store.questions_in(category).await,
        }
    }
}

/// Pick the next quiz question for the given request.
///
/// The category is resolved before the store is touched, so a request
/// without a usable category never reads any questions.
pub async fn next_question<P>(store: &P, request: &QuizRequest) -> Result<QuizOutcome<Question>>
where
    P: QuestionPool + Sync + ?Sized,
{
    let filter = request.category_filter()?;
    let pool = filter.load(store).await.map_err(|err| {
        error!("Failed to load quiz pool for {filter:?}: {err}");
        Error::not_found(format!("Question pool for {filter:?}"))
    })?;
    debug!(
        "Quiz pool for {filter:?} has {} questions, {} previously seen",
        pool.len(),
        request.previous_questions.len()
    );

    let outcome = select_next(&pool, &request.previous_questions, &mut rand::thread_rng());
    Ok(outcome.map(Clone::clone))
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::model::api::quiz::RawCategoryId;

    use super::*;

    /// In-memory store that records how often it is read.
    struct FakeStore {
        questions: Vec<Question>,
        reads: AtomicUsize,
        fail: bool,
    }

    impl FakeStore {
        fn new(questions: Vec<Question>) -> Self {
            Self {
                questions,
                reads: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(Vec::new())
            }
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }

        fn read(
            &self,
            keep: impl Fn(&Question) -> bool,
        ) -> std::result::Result<Vec<Question>, DbError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "store offline").into());
            }
            Ok(self.questions.iter().filter(|q| keep(q)).cloned().collect())
        }
    }

    #[rocket::async_trait]
    impl QuestionPool for FakeStore {
        async fn all_questions(&self) -> std::result::Result<Vec<Question>, DbError> {
            self.read(|_| true)
        }

        async fn questions_in(
            &self,
            category: CategoryId,
        ) -> std::result::Result<Vec<Question>, DbError> {
            self.read(|question| question.category == category)
        }
    }

    /// Q1..Q3 in category 1, Q4 in category 2.
    fn store() -> FakeStore {
        FakeStore::new(vec![
            Question::example_with_id(1, 1),
            Question::example_with_id(2, 1),
            Question::example_with_id(3, 1),
            Question::example_with_id(4, 2),
        ])
    }

    #[rocket::async_test]
    async fn last_unseen_in_category() {
        let store = store();
        let request = QuizRequest::new([1, 2], RawCategoryId::Number(1));
        let outcome = next_question(&store, &request).await.unwrap();
        assert_eq!(outcome, QuizOutcome::Found(Question::example_with_id(3, 1)));
        assert_eq!(store.reads(), 1);
    }

    #[rocket::async_test]
    async fn category_exhausted() {
        let store = store();
        let request = QuizRequest::new([1, 2, 3], RawCategoryId::Text("1".to_string()));
        let outcome = next_question(&store, &request).await.unwrap();
        assert_eq!(outcome, QuizOutcome::Exhausted);
    }

    #[rocket::async_test]
    async fn all_categories() {
        let store = store();
        // Category 1 is used up, but "all" still has question 4.
        let request = QuizRequest::new([1, 2, 3], RawCategoryId::Number(0));
        let outcome = next_question(&store, &request).await.unwrap();
        assert_eq!(outcome, QuizOutcome::Found(Question::example_with_id(4, 2)));
    }

    #[rocket::async_test]
    async fn unknown_category_is_exhausted() {
        let store = store();
        let request = QuizRequest::new([], RawCategoryId::Number(77));
        let outcome = next_question(&store, &request).await.unwrap();
        assert_eq!(outcome, QuizOutcome::Exhausted);
    }

    #[rocket::async_test]
    async fn empty_category_never_reads_store() {
        let store = store();
        let request = QuizRequest::new([], RawCategoryId::Text(String::new()));
        let err = next_question(&store, &request).await.unwrap_err();
        assert_eq!(err.status().code, 422);
        assert_eq!(store.reads(), 0);

        let request = QuizRequest {
            previous_questions: Default::default(),
            quiz_category: None,
        };
        let err = next_question(&store, &request).await.unwrap_err();
        assert_eq!(err.status().code, 400);
        assert_eq!(store.reads(), 0);
    }

    #[rocket::async_test]
    async fn store_failure_is_not_found() {
        let store = FakeStore::failing();
        let request = QuizRequest::new([], RawCategoryId::Number(0));
        let err = next_question(&store, &request).await.unwrap_err();
        assert_eq!(err.status().code, 404);
        assert_eq!(store.reads(), 1);
    }

    #[rocket::async_test]
    async fn pool_is_reread_every_call() {
        let store = store();
        let request = QuizRequest::new([], RawCategoryId::Number(2));
        for expected_reads in 1..=3 {
            next_question(&store, &request).await.unwrap();
            assert_eq!(store.reads(), expected_reads);
        }
    }
}
