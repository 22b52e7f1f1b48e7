//! DB-compatible (e.g. de/serialisable) types.
//!
//! The types in this module are serialised in an DB-friendly way, e.g.:
//!
//! - IDs are stored in the `_id` field.

mod category;
pub use category::Category;

mod question;
pub use question::{Question, QuestionCore};
