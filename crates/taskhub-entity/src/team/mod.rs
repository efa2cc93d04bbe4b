//! Team entities.

pub mod member;
pub mod model;
pub mod role;

pub use member::{TeamMember, TeamMemberDetail};
pub use model::{Team, TeamWithMembers};
pub use role::TeamRole;
