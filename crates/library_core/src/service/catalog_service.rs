//! Catalog use-case service.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - `update_book` and `delete_book` report a missing id as `NotFound`.

use crate::model::book::{Book, BookFields, BookId};
use crate::repo::book_repo::BookRepository;
use crate::repo::RepoResult;
use log::info;

/// Book CRUD over a repository implementation.
pub struct CatalogService<R: BookRepository> {
    repo: R,
}

impl<R: BookRepository> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Inserts a book and returns its new identifier.
    pub fn add_book(&self, fields: &BookFields) -> RepoResult<BookId> {
        let id = self.repo.create_book(fields)?;
        info!("event=book_add module=catalog status=ok book_id={id}");
        Ok(id)
    }

    /// Replaces every mutable field of an existing book.
    pub fn update_book(&self, id: BookId, fields: &BookFields) -> RepoResult<()> {
        self.repo.update_book(id, fields)?;
        info!("event=book_update module=catalog status=ok book_id={id}");
        Ok(())
    }

    /// Deletes a book and every rating that references it.
    pub fn delete_book(&self, id: BookId) -> RepoResult<()> {
        let removed_ratings = self.repo.delete_book(id)?;
        info!(
            "event=book_delete module=catalog status=ok book_id={id} removed_ratings={removed_ratings}"
        );
        Ok(())
    }

    pub fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        self.repo.get_book(id)
    }

    /// All books, title ascending (byte-wise).
    pub fn list_books(&self) -> RepoResult<Vec<Book>> {
        self.repo.list_books()
    }
}
