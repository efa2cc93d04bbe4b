//! HTTP request handlers, one module per resource.

pub mod auth;
pub mod health;
pub mod notification;
pub mod task;
pub mod team;
pub mod user;
