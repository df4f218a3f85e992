use serde::Serialize;
use thiserror::Error;

use crate::{Permission, Session};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not authenticated")]
    Unauthenticated,

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(Permission),
}

/// Authorize the current session (if any) for one permission tag.
///
/// - No IO
/// - No panics
/// - Plain set membership: no wildcard, no implication between tags
pub fn authorize(session: Option<&Session>, required: Permission) -> Result<(), AuthzError> {
    let session = session.ok_or(AuthzError::Unauthenticated)?;
    if session.has_permission(required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required))
    }
}

/// Audit-friendly description of an authorization decision.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub required_permission: Permission,
    pub granted: bool,
    pub reason: String,
    pub held_permissions: Vec<Permission>,
}

/// Explain why `authorize` would allow or deny `required`.
pub fn explain_authorization(
    session: Option<&Session>,
    required: Permission,
) -> AuthorizationExplanation {
    let held_permissions: Vec<Permission> = session
        .map(|s| s.permissions.iter().collect())
        .unwrap_or_default();

    let (granted, reason) = match authorize(session, required) {
        Ok(()) => (true, format!("session holds '{required}'")),
        Err(AuthzError::Unauthenticated) => (false, "no active session".to_string()),
        Err(AuthzError::Forbidden(_)) => (
            false,
            format!("session lacks '{required}'; held: {held_permissions:?}"),
        ),
    };

    AuthorizationExplanation {
        required_permission: required,
        granted,
        reason,
        held_permissions,
    }
}
