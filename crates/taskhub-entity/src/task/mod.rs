//! Task entities.

pub mod attachment;
pub mod model;
pub mod priority;
pub mod status;
pub mod subtask;

pub use attachment::{Attachment, NewAttachment};
pub use model::{CreateTask, Task, TaskDetail};
pub use priority::TaskPriority;
pub use status::TaskStatus;
pub use subtask::SubTask;
