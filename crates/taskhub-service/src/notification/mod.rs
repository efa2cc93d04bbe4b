//! Notification feed services.

pub mod service;

pub use service::NotificationService;
