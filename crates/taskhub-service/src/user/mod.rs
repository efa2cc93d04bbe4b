//! User registration and profile services.

pub mod service;

pub use service::{RegisterUserRequest, UserService};
