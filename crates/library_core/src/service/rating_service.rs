//! Rating ledger use-cases and aggregate views.
//!
//! # Invariants
//! - Out-of-range scores are rejected before storage is touched.
//! - Unrated books are absent from averages; the browser projection shows
//!   them as `0.0`.

use crate::model::book::{Book, BookId};
use crate::model::rating::{RatedBook, RatingScore, RatingSummary};
use crate::model::user::UserId;
use crate::repo::rating_repo::RatingRepository;
use crate::repo::RepoResult;
use log::info;
use std::collections::BTreeMap;

/// Rating ledger over a repository implementation.
pub struct RatingService<R: RatingRepository> {
    repo: R,
}

impl<R: RatingRepository> RatingService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Records or overwrites the score `user_id` gave `book_id`.
    pub fn set_rating(&self, user_id: UserId, book_id: BookId, score: i64) -> RepoResult<()> {
        let score = RatingScore::new(score)?;
        self.repo.upsert_rating(user_id, book_id, score)?;
        info!(
            "event=rating_set module=ratings status=ok user_id={user_id} book_id={book_id} score={}",
            score.value()
        );
        Ok(())
    }

    /// Every score made by `user_id`, keyed by book. Unknown users yield an empty map.
    pub fn get_user_ratings(&self, user_id: UserId) -> RepoResult<BTreeMap<BookId, u8>> {
        self.repo.scores_for_user(user_id)
    }

    /// Mean score per rated book.
    pub fn get_average_ratings(&self) -> RepoResult<BTreeMap<BookId, f64>> {
        Ok(self
            .repo
            .summaries()?
            .into_iter()
            .map(|(book_id, summary)| (book_id, summary.average))
            .collect())
    }

    pub fn get_rating_summaries(&self) -> RepoResult<BTreeMap<BookId, RatingSummary>> {
        self.repo.summaries()
    }
}

/// Joins an ordered book list with aggregates and one user's scores.
///
/// Book order is preserved.
pub fn combine_rated_books(
    books: Vec<Book>,
    summaries: &BTreeMap<BookId, RatingSummary>,
    user_scores: &BTreeMap<BookId, u8>,
) -> Vec<RatedBook> {
    books
        .into_iter()
        .map(|book| {
            let summary = summaries.get(&book.id);
            RatedBook {
                average: summary.map_or(0.0, |summary| summary.average),
                rating_count: summary.map_or(0, |summary| summary.count),
                user_score: user_scores.get(&book.id).copied(),
                book,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::combine_rated_books;
    use crate::model::book::Book;
    use crate::model::rating::RatingSummary;
    use std::collections::BTreeMap;

    fn book(id: i64, title: &str) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: String::new(),
            genre: String::new(),
            external_id: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn unrated_books_default_to_zero_and_order_is_kept() {
        let summaries = BTreeMap::from([(
            2,
            RatingSummary {
                average: 4.5,
                count: 2,
            },
        )]);
        let user_scores = BTreeMap::from([(2, 5u8)]);

        let rated = combine_rated_books(
            vec![book(2, "Atlas"), book(1, "Dune")],
            &summaries,
            &user_scores,
        );

        assert_eq!(rated.len(), 2);
        assert_eq!(rated[0].book.title, "Atlas");
        assert_eq!(rated[0].average, 4.5);
        assert_eq!(rated[0].rating_count, 2);
        assert_eq!(rated[0].user_score, Some(5));
        assert_eq!(rated[1].average, 0.0);
        assert_eq!(rated[1].rating_count, 0);
        assert_eq!(rated[1].user_score, None);
    }
}
