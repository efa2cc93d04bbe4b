//! User entities.

pub mod model;

pub use model::{CreateUser, User, UserSummary};
