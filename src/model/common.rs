//! Types shared between the DB and API representations.

use std::ops::RangeInclusive;

/// Unique ID of a question. Allocated from 1 upwards.
pub type QuestionId = u32;

/// Unique ID of a category. Allocated from 1 upwards.
pub type CategoryId = u32;

/// Quiz category ID meaning "questions from every category".
pub const ALL_CATEGORIES: CategoryId = 0;

/// Allowed question difficulties.
pub const DIFFICULTY_RANGE: RangeInclusive<u8> = 1..=5;
