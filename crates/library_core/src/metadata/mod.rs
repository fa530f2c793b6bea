//! Best-effort book metadata lookup by external identifier.
//!
//! # Responsibility
//! - Query the external volumes search endpoint for one ISBN.
//! - Extract `title`, `authors` and `description` from the raw body.
//!
//! # Invariants
//! - Lookups never fail the caller; every failure becomes an empty result.
//! - Results are advisory and never written to the catalog automatically.

use serde::{Deserialize, Serialize};

pub mod extract;
pub mod resolver;
pub mod transport;

pub use extract::extract_metadata;
pub use resolver::{MetadataResolver, PendingLookup};
pub use transport::{HttpLookupTransport, LookupError, LookupResponse, LookupTransport};

/// Partial metadata for one book. Absent fields were not found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// First listed author only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BookMetadata {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.authors.is_none() && self.description.is_none()
    }

    /// Number of fields that were found.
    pub fn field_count(&self) -> usize {
        [&self.title, &self.authors, &self.description]
            .iter()
            .filter(|field| field.is_some())
            .count()
    }
}
