//! Catalog domain model.
//!
//! # Responsibility
//! - Define the records shared by the credential store, catalog and ledger.
//! - Own write-side validation that runs before anything reaches storage.
//!
//! # Invariants
//! - Identifiers are assigned by storage and never reused.
//! - A `RatingScore` can only hold a value in `1..=5`.

pub mod book;
pub mod rating;
pub mod user;
pub mod validation;
