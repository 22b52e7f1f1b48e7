use std::collections::HashSet;

use rand::{seq::SliceRandom, Rng};

use crate::model::{common::QuestionId, db::Question};

/// Result of drawing the next question of a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizOutcome<Q> {
    /// A question the caller has not seen yet.
    Found(Q),
    /// Every question in the pool has been seen. This is the end of the quiz,
    /// not an error.
    Exhausted,
}

impl<Q> QuizOutcome<Q> {
    pub fn map<U>(self, f: impl FnOnce(Q) -> U) -> QuizOutcome<U> {
        match self {
            Self::Found(question) => QuizOutcome::Found(f(question)),
            Self::Exhausted => QuizOutcome::Exhausted,
        }
    }
}

/// Draw a question uniformly at random from those in `pool` whose IDs are not
/// in `seen`.
///
/// IDs in `seen` that aren't in `pool` (e.g. deleted questions) are ignored.
pub fn select_next<'p, R>(
    pool: &'p [Question],
    seen: &HashSet<QuestionId>,
    rng: &mut R,
) -> QuizOutcome<&'p Question>
where
    R: Rng + ?Sized,
{
    let unseen = pool
        .iter()
        .filter(|question| !seen.contains(&question.id))
        .collect::<Vec<_>>();
    match unseen.choose(rng) {
        Some(question) => QuizOutcome::Found(*question),
        None => QuizOutcome::Exhausted,
    }
}
