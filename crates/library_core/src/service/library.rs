//! Library facade: the only entry point for presentation-layer callers.
//!
//! # Responsibility
//! - Own the storage location and the metadata resolver.
//! - Expose register/login, catalog, ledger and lookup operations as plain
//!   calls; callers never see SQL or connections.
//!
//! # Invariants
//! - The schema is ensured before `open` returns.
//! - A file-backed library opens a fresh connection per operation and
//!   closes it before returning. Only an in-memory library keeps one
//!   connection, since its data lives nowhere else.
//! - Multi-statement writes use a transaction that rolls back on drop.
//! - Metadata lookups never fail and never write to the catalog.

use crate::config::{ConfigError, LibraryConfig, StorageLocation};
use crate::credential::Argon2CredentialHasher;
use crate::db::{ensure_schema, open_db, open_db_in_memory, DbError, DbResult};
use crate::metadata::{
    BookMetadata, HttpLookupTransport, LookupTransport, MetadataResolver, PendingLookup,
};
use crate::model::book::{Book, BookFields, BookId};
use crate::model::rating::RatedBook;
use crate::model::user::{User, UserId};
use crate::repo::book_repo::SqliteBookRepository;
use crate::repo::rating_repo::SqliteRatingRepository;
use crate::repo::user_repo::SqliteUserRepository;
use crate::repo::RepoResult;
use crate::service::auth_service::AuthService;
use crate::service::catalog_service::CatalogService;
use crate::service::rating_service::{combine_rated_books, RatingService};
use log::warn;
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::Arc;

/// Failure to bring the library up.
#[derive(Debug)]
pub enum LibraryError {
    Config(ConfigError),
    Db(DbError),
}

impl Display for LibraryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LibraryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<ConfigError> for LibraryError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for LibraryError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

enum Storage {
    Memory(Connection),
    File(PathBuf),
}

/// Catalog core bound to one storage location.
pub struct Library {
    storage: Storage,
    config: LibraryConfig,
    hasher: Argon2CredentialHasher,
    resolver: Option<MetadataResolver>,
}

impl Library {
    /// Validates `config`, opens storage and ensures the schema.
    ///
    /// A metadata client that cannot be built is logged and leaves lookups
    /// returning empty results; it never prevents the catalog from opening.
    pub fn open(config: LibraryConfig) -> Result<Self, LibraryError> {
        config.validate()?;
        let storage = match config.storage_location() {
            StorageLocation::Memory => Storage::Memory(open_db_in_memory()?),
            StorageLocation::File(path) => {
                // Creates the file and ensures the schema, then closes again.
                open_db(&path)?;
                Storage::File(path)
            }
        };

        let resolver = match HttpLookupTransport::new(&config.metadata) {
            Ok(transport) => Some(MetadataResolver::new(
                Arc::new(transport),
                config.metadata.endpoint.clone(),
            )),
            Err(err) => {
                warn!(
                    "event=metadata_client_init module=metadata status=error error={}",
                    err
                );
                None
            }
        };

        Ok(Self {
            storage,
            config,
            hasher: Argon2CredentialHasher::new(),
            resolver,
        })
    }

    /// Opens a private in-memory library with default settings.
    pub fn open_in_memory() -> Result<Self, LibraryError> {
        Self::open(LibraryConfig::in_memory())
    }

    /// Replaces the lookup transport, keeping the configured endpoint.
    pub fn with_metadata_transport(mut self, transport: Arc<dyn LookupTransport>) -> Self {
        self.resolver = Some(MetadataResolver::new(
            transport,
            self.config.metadata.endpoint.clone(),
        ));
        self
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    /// Ensures the catalog relations exist. No effect after the first success.
    pub fn ensure_schema(&mut self) -> DbResult<()> {
        match &mut self.storage {
            Storage::Memory(conn) => ensure_schema(conn),
            Storage::File(path) => open_db(path.as_path()).map(drop),
        }
    }

    // Credential store

    pub fn register(&self, username: &str, secret: &str) -> RepoResult<bool> {
        self.with_conn(|conn| self.auth(conn).register(username, secret))
    }

    pub fn login(&self, username: &str, secret: &str) -> RepoResult<Option<User>> {
        self.with_conn(|conn| self.auth(conn).login(username, secret))
    }

    pub fn find_user(&self, id: UserId) -> RepoResult<Option<User>> {
        self.with_conn(|conn| self.auth(conn).find_user(id))
    }

    // Catalog

    pub fn add_book(&self, fields: &BookFields) -> RepoResult<BookId> {
        self.with_conn(|conn| catalog(conn).add_book(fields))
    }

    pub fn update_book(&self, id: BookId, fields: &BookFields) -> RepoResult<()> {
        self.with_conn(|conn| catalog(conn).update_book(id, fields))
    }

    pub fn delete_book(&self, id: BookId) -> RepoResult<()> {
        self.with_conn(|conn| catalog(conn).delete_book(id))
    }

    pub fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        self.with_conn(|conn| catalog(conn).get_book(id))
    }

    pub fn list_books(&self) -> RepoResult<Vec<Book>> {
        self.with_conn(|conn| catalog(conn).list_books())
    }

    // Rating ledger

    pub fn set_rating(&self, user_id: UserId, book_id: BookId, score: i64) -> RepoResult<()> {
        self.with_conn(|conn| ratings(conn).set_rating(user_id, book_id, score))
    }

    pub fn get_user_ratings(&self, user_id: UserId) -> RepoResult<BTreeMap<BookId, u8>> {
        self.with_conn(|conn| ratings(conn).get_user_ratings(user_id))
    }

    pub fn get_average_ratings(&self) -> RepoResult<BTreeMap<BookId, f64>> {
        self.with_conn(|conn| ratings(conn).get_average_ratings())
    }

    /// Title-ordered books with averages (`0.0` if unrated) and the user's own scores.
    pub fn list_rated_books(&self, user_id: UserId) -> RepoResult<Vec<RatedBook>> {
        self.with_conn(|conn| {
            let books = catalog(conn).list_books()?;
            let ledger = ratings(conn);
            let summaries = ledger.get_rating_summaries()?;
            let user_scores = ledger.get_user_ratings(user_id)?;
            Ok(combine_rated_books(books, &summaries, &user_scores))
        })
    }

    // Metadata resolver

    /// Blocking lookup; see [`MetadataResolver::fetch_by_identifier`].
    pub fn fetch_by_identifier(&self, isbn: &str) -> BookMetadata {
        self.resolver
            .as_ref()
            .map(|resolver| resolver.fetch_by_identifier(isbn))
            .unwrap_or_default()
    }

    /// Off-thread lookup; see [`MetadataResolver::spawn_fetch`].
    pub fn spawn_fetch(&self, isbn: &str) -> Option<PendingLookup> {
        self.resolver
            .as_ref()
            .map(|resolver| resolver.spawn_fetch(isbn))
    }

    /// Runs `f` against the storage: borrowed for memory, freshly opened
    /// (and closed on return) for a file.
    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> RepoResult<T>) -> RepoResult<T> {
        match &self.storage {
            Storage::Memory(conn) => f(conn),
            Storage::File(path) => {
                let conn = open_db(path.as_path())?;
                f(&conn)
            }
        }
    }

    fn auth<'c>(
        &self,
        conn: &'c Connection,
    ) -> AuthService<'_, SqliteUserRepository<'c>, Argon2CredentialHasher> {
        AuthService::new(SqliteUserRepository::new(conn), &self.hasher)
    }
}

fn catalog(conn: &Connection) -> CatalogService<SqliteBookRepository<'_>> {
    CatalogService::new(SqliteBookRepository::new(conn))
}

fn ratings(conn: &Connection) -> RatingService<SqliteRatingRepository<'_>> {
    RatingService::new(SqliteRatingRepository::new(conn))
}
