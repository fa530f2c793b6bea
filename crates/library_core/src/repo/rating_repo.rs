//! Rating ledger repository contract and SQLite implementation.
//!
//! # Invariants
//! - `upsert_rating` is one `INSERT ... ON CONFLICT DO UPDATE` statement;
//!   there is no read-then-write window.
//! - Only `RatingScore` values reach SQL; the `CHECK` constraint is the
//!   second line of defense.

use crate::model::book::BookId;
use crate::model::rating::{Rating, RatingScore, RatingSummary};
use crate::model::user::UserId;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;

/// Repository interface for the ratings relation.
pub trait RatingRepository {
    fn upsert_rating(&self, user_id: UserId, book_id: BookId, score: RatingScore)
        -> RepoResult<()>;
    fn get_rating(&self, user_id: UserId, book_id: BookId) -> RepoResult<Option<Rating>>;
    fn scores_for_user(&self, user_id: UserId) -> RepoResult<BTreeMap<BookId, u8>>;
    /// Per-book aggregates; books without ratings are absent.
    fn summaries(&self) -> RepoResult<BTreeMap<BookId, RatingSummary>>;
}

/// SQLite-backed rating repository.
pub struct SqliteRatingRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRatingRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RatingRepository for SqliteRatingRepository<'_> {
    fn upsert_rating(
        &self,
        user_id: UserId,
        book_id: BookId,
        score: RatingScore,
    ) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO ratings (user_id, book_id, score)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (user_id, book_id) DO UPDATE SET score = excluded.score;",
            params![user_id, book_id, score.value()],
        )?;
        Ok(())
    }

    fn get_rating(&self, user_id: UserId, book_id: BookId) -> RepoResult<Option<Rating>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, user_id, book_id, score
                 FROM ratings
                 WHERE user_id = ?1 AND book_id = ?2;",
                params![user_id, book_id],
                |row| {
                    Ok((
                        row.get::<_, i64>("id")?,
                        row.get::<_, UserId>("user_id")?,
                        row.get::<_, BookId>("book_id")?,
                        row.get::<_, i64>("score")?,
                    ))
                },
            )
            .optional()?;

        let Some((id, user_id, book_id, raw_score)) = row else {
            return Ok(None);
        };
        Ok(Some(Rating {
            id,
            user_id,
            book_id,
            score: parse_score(raw_score)?,
        }))
    }

    fn scores_for_user(&self, user_id: UserId) -> RepoResult<BTreeMap<BookId, u8>> {
        let mut stmt = self
            .conn
            .prepare("SELECT book_id, score FROM ratings WHERE user_id = ?1;")?;
        let mut rows = stmt.query([user_id])?;
        let mut scores = BTreeMap::new();

        while let Some(row) = rows.next()? {
            let book_id: BookId = row.get("book_id")?;
            let score = parse_score(row.get("score")?)?;
            scores.insert(book_id, score.value());
        }

        Ok(scores)
    }

    fn summaries(&self) -> RepoResult<BTreeMap<BookId, RatingSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT book_id, AVG(score) AS average, COUNT(*) AS rating_count
             FROM ratings
             GROUP BY book_id;",
        )?;
        let mut rows = stmt.query([])?;
        let mut summaries = BTreeMap::new();

        while let Some(row) = rows.next()? {
            summaries.insert(
                row.get::<_, BookId>("book_id")?,
                RatingSummary {
                    average: row.get("average")?,
                    count: row.get("rating_count")?,
                },
            );
        }

        Ok(summaries)
    }
}

fn parse_score(raw: i64) -> RepoResult<RatingScore> {
    RatingScore::new(raw)
        .map_err(|_| RepoError::InvalidData(format!("invalid score `{raw}` in ratings.score")))
}
