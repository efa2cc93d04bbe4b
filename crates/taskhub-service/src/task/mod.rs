//! Task, subtask, and attachment services.

pub mod assignment;
pub mod service;

pub use assignment::AssignmentNotifier;
pub use service::{
    AttachmentFailure, CreateTaskInput, TaskCreation, TaskService, UpdateSubtaskInput,
    UpdateTaskInput,
};
