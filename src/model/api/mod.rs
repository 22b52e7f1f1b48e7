//! API-compatible types.
//!
//! The types in this module are serialised in an API-friendly way, e.g.:
//!
//! - IDs are serialised as `id` rather than `_id`.
//! - Successful responses are wrapped in [`Success`].

use serde::{Deserialize, Serialize};

pub mod category;
pub mod pagination;
pub mod question;
pub mod quiz;

/// Envelope of every successful response: `{"success": true, ...body}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Success<T> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Success<T> {
    pub fn new(body: T) -> Self {
        Self {
            success: true,
            body,
        }
    }
}
