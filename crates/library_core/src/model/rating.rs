//! Per-user book ratings and their aggregate views.
//!
//! # Invariants
//! - Scores are always within `RatingScore::MIN..=RatingScore::MAX`.
//! - At most one rating exists per `(user_id, book_id)`.

use super::book::{Book, BookId};
use super::user::UserId;
use super::validation::ValidationError;
use serde::{Deserialize, Serialize};

/// Validated rating score in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct RatingScore(u8);

impl RatingScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Validates a raw caller-provided score.
    pub fn new(score: i64) -> Result<Self, ValidationError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&score) {
            // Range checked above, the cast cannot truncate.
            Ok(Self(score as u8))
        } else {
            Err(ValidationError::ScoreOutOfRange(score))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for RatingScore {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RatingScore> for u8 {
    fn from(value: RatingScore) -> Self {
        value.0
    }
}

/// Persisted rating row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub id: i64,
    pub user_id: UserId,
    pub book_id: BookId,
    pub score: RatingScore,
}

/// Catalog browser projection: a book with its aggregate and the viewer's own score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedBook {
    pub book: Book,
    /// Mean of all scores; `0.0` when the book is unrated.
    pub average: f64,
    pub rating_count: u32,
    /// Score given by the viewing user, if any.
    pub user_score: Option<u8>,
}

/// Aggregate of all scores recorded for one book.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub average: f64,
    pub count: u32,
}
