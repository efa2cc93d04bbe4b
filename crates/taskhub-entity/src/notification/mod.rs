//! Notification entities.

pub mod model;

pub use model::{Notification, NotificationDetail, NotificationTaskRef, KIND_TASK_ASSIGNED};
