//! Quiz mode: drawing questions a caller has not yet seen.

mod pool;
mod selector;

pub use pool::{next_question, CategoryFilter, QuestionPool};
pub use selector::{select_next, QuizOutcome};
