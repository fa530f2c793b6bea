//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep callers decoupled from storage details through [`library::Library`].

pub mod auth_service;
pub mod catalog_service;
pub mod library;
pub mod rating_service;
