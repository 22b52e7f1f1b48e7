//! Data types, split by where they live:
//! - `common`: ID types and constants shared by every layer.
//! - `db`: documents as stored in MongoDB, with their queries.
//! - `api`: request and response bodies.
//! - `quiz`: question selection for quiz sessions.
//! - `mongodb`: collection plumbing and ID counters.

pub mod api;
pub mod common;
pub mod db;
pub mod mongodb;
pub mod quiz;
