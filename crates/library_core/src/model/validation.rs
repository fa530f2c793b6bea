//! Input validation errors raised before any catalog write.
//!
//! Every write path checks its input here first, so a rejected call leaves
//! storage untouched.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input rejected before it reaches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Book title is empty or whitespace only.
    BlankTitle,
    /// Username is empty or whitespace only.
    BlankUsername,
    /// Secret is the empty string.
    EmptySecret,
    /// Rating score outside `1..=5`.
    ScoreOutOfRange(i64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "book title must not be blank"),
            Self::BlankUsername => write!(f, "username must not be blank"),
            Self::EmptySecret => write!(f, "secret must not be empty"),
            Self::ScoreOutOfRange(score) => {
                write!(f, "rating score {score} is outside the allowed range 1..=5")
            }
        }
    }
}

impl Error for ValidationError {}
