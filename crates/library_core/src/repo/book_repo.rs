//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `books` relation.
//! - Own the ratings cascade on book deletion.
//!
//! # Invariants
//! - Write paths call `BookFields::validate()` before SQL mutations.
//! - Deletion removes dependent ratings first, in the same transaction.
//! - Listing is ordered by title using byte-wise (`BINARY`) collation.

use crate::model::book::{Book, BookFields, BookId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    title,
    author,
    genre,
    external_id,
    description
FROM books";

/// Repository interface for book CRUD operations.
pub trait BookRepository {
    fn create_book(&self, fields: &BookFields) -> RepoResult<BookId>;
    fn update_book(&self, id: BookId, fields: &BookFields) -> RepoResult<()>;
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    fn list_books(&self) -> RepoResult<Vec<Book>>;
    /// Returns the number of ratings removed along with the book.
    fn delete_book(&self, id: BookId) -> RepoResult<usize>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn create_book(&self, fields: &BookFields) -> RepoResult<BookId> {
        fields.validate()?;

        self.conn.execute(
            "INSERT INTO books (
                title,
                author,
                genre,
                external_id,
                description
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                fields.title.as_str(),
                fields.author.as_str(),
                fields.genre.as_str(),
                fields.external_id.as_str(),
                fields.description.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_book(&self, id: BookId, fields: &BookFields) -> RepoResult<()> {
        fields.validate()?;

        let changed = self.conn.execute(
            "UPDATE books
             SET
                title = ?1,
                author = ?2,
                genre = ?3,
                external_id = ?4,
                description = ?5
             WHERE id = ?6;",
            params![
                fields.title.as_str(),
                fields.author.as_str(),
                fields.genre.as_str(),
                fields.external_id.as_str(),
                fields.description.as_str(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::book_not_found(id));
        }

        Ok(())
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        let book = self
            .conn
            .query_row(
                &format!("{BOOK_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_book_row,
            )
            .optional()?;
        Ok(book)
    }

    fn list_books(&self) -> RepoResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} ORDER BY title COLLATE BINARY ASC;"))?;
        let books = stmt
            .query_map([], parse_book_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }

    fn delete_book(&self, id: BookId) -> RepoResult<usize> {
        // Dropping the transaction without commit rolls back both deletes.
        let tx = self.conn.unchecked_transaction()?;
        let removed_ratings = tx.execute("DELETE FROM ratings WHERE book_id = ?1;", [id])?;
        let removed_books = tx.execute("DELETE FROM books WHERE id = ?1;", [id])?;

        if removed_books == 0 {
            return Err(RepoError::book_not_found(id));
        }

        tx.commit()?;
        Ok(removed_ratings)
    }
}

fn parse_book_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get("id")?,
        title: row.get("title")?,
        author: row.get::<_, Option<String>>("author")?.unwrap_or_default(),
        genre: row.get::<_, Option<String>>("genre")?.unwrap_or_default(),
        external_id: row
            .get::<_, Option<String>>("external_id")?
            .unwrap_or_default(),
        description: row
            .get::<_, Option<String>>("description")?
            .unwrap_or_default(),
    })
}
