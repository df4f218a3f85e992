//! Credential verification boundary.

use serde::{Deserialize, Serialize};

use erpdesk_core::{Email, UserId};

use crate::{AuthError, Permission, PermissionSet, Role, SessionGrant};

/// What the user typed into the login form.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub identity: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(identity: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            secret: secret.into(),
        }
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Verifies credentials against an identity source.
///
/// Implementations must not touch the session store; they only answer
/// "who is this" or reject.
pub trait Authenticator {
    fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> impl core::future::Future<Output = Result<SessionGrant, AuthError>>;
}

/// Accepts a single fixed credential pair and grants the administrator profile.
///
/// Placeholder identity source for demos and local development. Replace with
/// a backend-backed `Authenticator` for anything real.
#[derive(Debug, Clone)]
pub struct DemoAuthenticator {
    email: String,
    password: String,
}

pub const DEMO_EMAIL: &str = "admin@demo";
pub const DEMO_PASSWORD: &str = "admin";

impl Default for DemoAuthenticator {
    fn default() -> Self {
        Self::new(DEMO_EMAIL, DEMO_PASSWORD)
    }
}

impl DemoAuthenticator {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    fn grant(&self, email: Email) -> SessionGrant {
        SessionGrant {
            user_id: UserId::new("1"),
            name: "Admin User".to_string(),
            email,
            role: Role::from_static("Administrator"),
            avatar: Some("/assets/avatar.png".to_string()),
            permissions: PermissionSet::from([
                Permission::Admin,
                Permission::Sales,
                Permission::Accounting,
                Permission::Procurement,
                Permission::Hr,
                Permission::Inventory,
            ]),
        }
    }
}

impl Authenticator for DemoAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<SessionGrant, AuthError> {
        let identity = credentials.identity.trim();
        if identity != self.email || credentials.secret != self.password {
            return Err(AuthError::CredentialRejected);
        }
        let email = Email::parse(identity).map_err(|_| AuthError::CredentialRejected)?;
        Ok(self.grant(email))
    }
}
