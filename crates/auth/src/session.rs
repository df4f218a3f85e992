use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use erpdesk_core::{Email, SessionId, UserId};

use crate::{Permission, PermissionSet, Role};

/// Profile granted by an identity source after credentials were accepted.
///
/// This is what an `Authenticator` hands back; the store turns it into a
/// `Session` by stamping it with a session id and a login time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionGrant {
    pub user_id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    pub avatar: Option<String>,
    pub permissions: PermissionSet,
}

/// The authenticated user as the shell sees it.
///
/// This is the record persisted under the session storage key. It is only
/// ever replaced whole (login) or removed (logout / corrupt data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    #[serde(default)]
    pub avatar: Option<String>,
    pub permissions: PermissionSet,
    pub authenticated_at: DateTime<Utc>,
}

impl Session {
    pub fn from_grant(grant: SessionGrant, session_id: SessionId, now: DateTime<Utc>) -> Self {
        Self {
            session_id,
            user_id: grant.user_id,
            name: grant.name,
            email: grant.email,
            role: grant.role,
            avatar: grant.avatar,
            permissions: grant.permissions,
            authenticated_at: now,
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(permission)
    }

    /// Single character shown when the avatar image is unavailable.
    pub fn initial(&self) -> char {
        self.name
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('U')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant() -> SessionGrant {
        SessionGrant {
            user_id: UserId::new("7"),
            name: "dana".to_string(),
            email: Email::parse("dana@demo").unwrap(),
            role: Role::new("Clerk"),
            avatar: None,
            permissions: PermissionSet::from([Permission::Sales]),
        }
    }

    #[test]
    fn from_grant_stamps_id_and_time() {
        let id = SessionId::new();
        let now = Utc::now();
        let session = Session::from_grant(grant(), id, now);
        assert_eq!(session.session_id, id);
        assert_eq!(session.authenticated_at, now);
        assert!(session.has_permission(Permission::Sales));
        assert!(!session.has_permission(Permission::Hr));
    }

    #[test]
    fn initial_falls_back_to_u() {
        let mut session = Session::from_grant(grant(), SessionId::new(), Utc::now());
        assert_eq!(session.initial(), 'D');
        session.name.clear();
        assert_eq!(session.initial(), 'U');
    }

    #[test]
    fn persisted_record_tolerates_missing_avatar() {
        let session = Session::from_grant(grant(), SessionId::new(), Utc::now());
        let mut value = serde_json::to_value(&session).unwrap();
        value.as_object_mut().unwrap().remove("avatar");
        let back: Session = serde_json::from_value(value).unwrap();
        assert_eq!(back, session);
    }
}
