//! Repository traits and their PostgreSQL implementations.
//!
//! Each module declares the storage trait a service depends on, plus the
//! `Pg*` implementation backed by a [`sqlx::PgPool`].

pub mod notification;
pub mod session;
pub mod task;
pub mod team;
pub mod user;

pub use notification::{NotificationRepository, PgNotificationRepository};
pub use session::{PgSessionRepository, SessionRepository};
pub use task::{PgTaskRepository, TaskRepository};
pub use team::{PgTeamRepository, TeamRepository};
pub use user::{PgUserRepository, UserRepository};
