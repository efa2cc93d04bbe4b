//! # taskhub-service
//!
//! Business logic service layer for Taskhub. Each service orchestrates
//! repositories and authentication to implement application-level use
//! cases.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references to repository traits, so
//! tests can substitute in-memory implementations.

pub mod context;
pub mod membership;
pub mod notification;
pub mod task;
pub mod team;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

pub use context::RequestContext;
pub use membership::MembershipGuard;
pub use notification::NotificationService;
pub use task::{AssignmentNotifier, TaskService};
pub use team::TeamService;
pub use user::UserService;
