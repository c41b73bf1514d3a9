//! SQLite storage backend for the filing engine.
//!
//! Exposes [`SqliteRepository`], an implementation of
//! [`itr_core::FilingRepository`] backed by sqlx, and
//! [`SqliteRepositoryFactory`] for registry-driven construction.

pub mod decimal;
pub mod factory;
pub mod repository;

pub use factory::SqliteRepositoryFactory;
pub use repository::SqliteRepository;
