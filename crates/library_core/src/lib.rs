//! Library catalog core: accounts, books and ratings over SQLite, plus
//! best-effort metadata lookup by ISBN.
//! This crate is the single source of truth for catalog invariants.

pub mod config;
pub mod credential;
pub mod db;
pub mod logging;
pub mod metadata;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, LibraryConfig, LoggingConfig, MetadataConfig, StorageLocation};
pub use credential::{Argon2CredentialHasher, CredentialError, CredentialHasher};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use metadata::{BookMetadata, LookupResponse, LookupTransport, MetadataResolver, PendingLookup};
pub use model::book::{Book, BookFields, BookId};
pub use model::rating::{RatedBook, Rating, RatingScore, RatingSummary};
pub use model::user::{User, UserId};
pub use model::validation::ValidationError;
pub use repo::{RepoError, RepoResult};
pub use service::library::{Library, LibraryError};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
