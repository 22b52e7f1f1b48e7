mod collection;
mod counter;
mod transaction;

pub use collection::{ensure_indexes_exist, Coll, MongoCollection};
pub use counter::{
    ensure_counters_exist, Counter, CATEGORY_ID_COUNTER_ID, QUESTION_ID_COUNTER_ID,
};
pub use transaction::{is_transient, should_retry, MAX_TRANSACTION_ATTEMPTS};
