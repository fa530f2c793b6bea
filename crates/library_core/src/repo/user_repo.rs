//! User repository contract and SQLite implementation.
//!
//! # Invariants
//! - Username uniqueness is enforced by the `UNIQUE` constraint; a conflict
//!   is reported as `None`, never as an error.
//! - Stored credentials are returned only to the credential store.

use crate::model::user::{User, UserId};
use crate::repo::RepoResult;
use rusqlite::{params, Connection, OptionalExtension};

/// User row together with its stored credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    pub user: User,
    pub credential: String,
}

/// Repository interface for the users relation.
pub trait UserRepository {
    /// Inserts a user; returns `None` when the username is already taken.
    fn insert_user(&self, username: &str, credential: &str) -> RepoResult<Option<UserId>>;
    fn find_by_username(&self, username: &str) -> RepoResult<Option<StoredCredential>>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn insert_user(&self, username: &str, credential: &str) -> RepoResult<Option<UserId>> {
        let changed = self.conn.execute(
            "INSERT INTO users (username, secret)
             VALUES (?1, ?2)
             ON CONFLICT (username) DO NOTHING;",
            params![username, credential],
        )?;

        if changed == 0 {
            return Ok(None);
        }
        Ok(Some(self.conn.last_insert_rowid()))
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Option<StoredCredential>> {
        let found = self
            .conn
            .query_row(
                "SELECT id, username, secret FROM users WHERE username = ?1;",
                [username],
                |row| {
                    Ok(StoredCredential {
                        user: User {
                            id: row.get("id")?,
                            username: row.get("username")?,
                        },
                        credential: row.get("secret")?,
                    })
                },
            )
            .optional()?;
        Ok(found)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let found = self
            .conn
            .query_row(
                "SELECT id, username FROM users WHERE id = ?1;",
                [id],
                |row| {
                    Ok(User {
                        id: row.get("id")?,
                        username: row.get("username")?,
                    })
                },
            )
            .optional()?;
        Ok(found)
    }
}
