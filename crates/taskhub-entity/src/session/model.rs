//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An active user session.
///
/// Sessions are created on login and closed on logout or expiry. Tokens
/// carry the session id so a logged-out token stops working even before
/// it expires.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// When the session was created (login time).
    pub created_at: DateTime<Utc>,
    /// When the session expires (absolute timeout).
    pub expires_at: DateTime<Utc>,
    /// When the session was terminated (logout), if it was.
    pub terminated_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Check whether the session is still active (not terminated and not expired).
    pub fn is_active(&self) -> bool {
        self.terminated_at.is_none() && self.expires_at > Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_in: Duration, terminated: bool) -> Session {
        let now = Utc::now();
        Session {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            created_at: now,
            expires_at: now + expires_in,
            terminated_at: terminated.then_some(now),
        }
    }

    #[test]
    fn active_session() {
        assert!(session(Duration::hours(1), false).is_active());
    }

    #[test]
    fn expired_session_is_inactive() {
        assert!(!session(Duration::hours(-1), false).is_active());
    }

    #[test]
    fn terminated_session_is_inactive() {
        assert!(!session(Duration::hours(1), true).is_active());
    }
}
