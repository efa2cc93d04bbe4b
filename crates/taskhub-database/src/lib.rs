//! # taskhub-database
//!
//! PostgreSQL database connection management, repository traits, and
//! the concrete PostgreSQL repository implementations for all Taskhub
//! entities. Services depend on the traits so storage can be swapped
//! out in tests.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
