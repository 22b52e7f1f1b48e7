use log::warn;
use mongodb::error::TRANSIENT_TRANSACTION_ERROR;

use crate::error::Error;

/// How many times a transaction is attempted before a transient failure is
/// reported to the caller.
pub const MAX_TRANSACTION_ATTEMPTS: u32 = 3;

/// Whether the transaction that produced `err` can be retried from scratch,
/// e.g. because it lost a write conflict with a concurrent transaction.
pub fn is_transient(err: &Error) -> bool {
    matches!(err, Error::Db(err) if err.contains_label(TRANSIENT_TRANSACTION_ERROR))
}

/// Decide whether to run a failed transaction again, logging if so.
pub fn should_retry(err: &Error, attempt: u32, what: &str) -> bool {
    if attempt < MAX_TRANSACTION_ATTEMPTS && is_transient(err) {
        warn!("Transaction to {what} failed on attempt {attempt}, retrying: {err}");
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use rocket::http::Status;

    use super::*;

    #[test]
    fn only_labelled_errors_are_transient() {
        let plain: mongodb::error::Error =
            io::Error::new(io::ErrorKind::ConnectionReset, "reset").into();
        assert!(!is_transient(&Error::Db(plain)));
        assert!(!is_transient(&Error::Status(Status::NotFound, String::new())));
        assert!(!should_retry(
            &Error::Status(Status::UnprocessableEntity, String::new()),
            1,
            "test"
        ));
    }
}
