//! Team management services.

pub mod service;

pub use service::TeamService;
