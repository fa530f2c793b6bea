//! Book record model.
//!
//! # Invariants
//! - `title` is never blank for a persisted book.
//! - Updates replace every mutable field; there is no partial patch.

use super::validation::ValidationError;
use crate::metadata::BookMetadata;
use serde::{Deserialize, Serialize};

/// Storage-assigned book identifier.
pub type BookId = i64;

/// Persisted catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    /// External identifier such as an ISBN.
    pub external_id: String,
    pub description: String,
}

impl Book {
    /// Returns the mutable field set of this book.
    pub fn fields(&self) -> BookFields {
        BookFields {
            title: self.title.clone(),
            author: self.author.clone(),
            genre: self.genre.clone(),
            external_id: self.external_id.clone(),
            description: self.description.clone(),
        }
    }
}

/// Mutable book fields used by insert and full-replacement update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub external_id: String,
    pub description: String,
}

impl BookFields {
    /// Creates a field set with only a title; other fields are empty.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Validates write-side rules before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankTitle);
        }
        Ok(())
    }

    /// Fills empty fields from a metadata lookup.
    ///
    /// Caller-provided values always win. `authors` maps onto `author`.
    /// Returns whether any field changed.
    pub fn apply_metadata(&mut self, metadata: &BookMetadata) -> bool {
        let mut changed = false;
        changed |= fill_if_empty(&mut self.title, metadata.title.as_deref());
        changed |= fill_if_empty(&mut self.author, metadata.authors.as_deref());
        changed |= fill_if_empty(&mut self.description, metadata.description.as_deref());
        changed
    }
}

fn fill_if_empty(target: &mut String, value: Option<&str>) -> bool {
    match value {
        Some(value) if target.trim().is_empty() && !value.is_empty() => {
            *target = value.to_string();
            true
        }
        _ => false,
    }
}
