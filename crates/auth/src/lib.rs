//! `erpdesk-auth`: session and permission boundary for the ERP shell.
//!
//! This crate is intentionally decoupled from HTTP, routing and rendering.
//! Storage is reached only through the `KeyValueStore` trait.

pub mod authorize;
pub mod credentials;
pub mod permissions;
pub mod roles;
pub mod session;
pub mod storage;
pub mod store;

pub use authorize::{authorize, explain_authorization, AuthorizationExplanation, AuthzError};
pub use credentials::{Authenticator, Credentials, DemoAuthenticator, DEMO_EMAIL, DEMO_PASSWORD};
pub use permissions::{Permission, PermissionSet};
pub use roles::Role;
pub use session::{Session, SessionGrant};
pub use storage::{KeyValueStore, MemoryStore, StorageError};
pub use store::{AuthError, AuthPhase, AuthSnapshot, RestoreOutcome, SessionStore, SESSION_KEY};
