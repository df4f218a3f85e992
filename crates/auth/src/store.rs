//! Session/permission store: the single owner of "who is logged in".
//!
//! Lifecycle:
//! - `restore()` once at startup (reads the persisted record)
//! - `login()` / `logout()` are the only mutations
//! - everything else is a read

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use erpdesk_core::SessionId;

use crate::{
    Authenticator, Credentials, KeyValueStore, Permission, Session, SessionGrant, StorageError,
};

/// Storage key holding the serialized `Session`.
pub const SESSION_KEY: &str = "erpdesk.session";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("stored session is unreadable: {0}")]
    StorageCorrupt(String),

    #[error("invalid credentials")]
    CredentialRejected,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("a login is already in progress")]
    LoginInProgress,
}

/// Where the store is in its lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPhase {
    /// Startup restore has not run yet; no redirect decision may be made.
    Restoring,
    /// Settled: either logged in or logged out.
    Ready,
    /// A login call is pending.
    LoggingIn,
}

/// What `restore()` found in storage.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored,
    Empty,
    DiscardedCorrupt,
    StorageUnavailable,
    AlreadyRestored,
}

/// Cloneable, read-only view of the store at one point in time.
///
/// UI layers keep one of these in a reactive cell and replace it after every
/// store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub phase: AuthPhase,
    pub session: Option<Session>,
}

impl AuthSnapshot {
    pub fn restoring() -> Self {
        Self {
            phase: AuthPhase::Restoring,
            session: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase != AuthPhase::Ready
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn check_permission(&self, permission: Permission) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.has_permission(permission))
    }
}

pub struct SessionStore<S> {
    storage: S,
    session: Option<Session>,
    restored: bool,
    login_pending: bool,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            session: None,
            restored: false,
            login_pending: false,
        }
    }

    /// Adopt the persisted session, if any. Runs once; later calls are no-ops.
    ///
    /// Never fails: unreadable data is removed and treated as logged out.
    pub fn restore(&mut self) -> RestoreOutcome {
        if self.restored {
            return RestoreOutcome::AlreadyRestored;
        }
        self.restored = true;

        let raw = match self.storage.get(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("no persisted session");
                return RestoreOutcome::Empty;
            }
            Err(err) => {
                tracing::warn!(error = %err, "session storage unreadable; starting logged out");
                return RestoreOutcome::StorageUnavailable;
            }
        };

        match decode_session(&raw) {
            Ok(session) => {
                tracing::info!(
                    session_id = %session.session_id,
                    user_id = %session.user_id,
                    "session restored"
                );
                self.session = Some(session);
                RestoreOutcome::Restored
            }
            Err(err) => {
                tracing::warn!(error = %err, "discarding corrupt persisted session");
                if let Err(err) = self.storage.remove(SESSION_KEY) {
                    tracing::warn!(error = %err, "failed to remove corrupt session record");
                }
                RestoreOutcome::DiscardedCorrupt
            }
        }
    }

    /// Verify credentials and, on success, persist and adopt the new session.
    ///
    /// On failure the previous session (if any) and the storage are untouched.
    pub async fn login<A: Authenticator>(
        &mut self,
        authenticator: &A,
        credentials: &Credentials,
    ) -> Result<Session, AuthError> {
        self.begin_login()?;
        let result = authenticator.authenticate(credentials).await;
        self.complete_login(result)
    }

    /// Mark a login as pending. Pair with `complete_login`.
    pub fn begin_login(&mut self) -> Result<(), AuthError> {
        if self.login_pending {
            return Err(AuthError::LoginInProgress);
        }
        self.login_pending = true;
        Ok(())
    }

    /// Finish a login started with `begin_login`.
    pub fn complete_login(
        &mut self,
        result: Result<SessionGrant, AuthError>,
    ) -> Result<Session, AuthError> {
        self.login_pending = false;

        let grant = match result {
            Ok(grant) => grant,
            Err(err) => {
                tracing::info!(error = %err, "login rejected");
                return Err(err);
            }
        };

        let session = Session::from_grant(grant, SessionId::new(), Utc::now());
        let encoded = serde_json::to_string(&session)
            .map_err(|e| AuthError::Storage(StorageError::Io(e.to_string())))?;
        self.storage.set(SESSION_KEY, &encoded)?;

        tracing::info!(
            session_id = %session.session_id,
            user_id = %session.user_id,
            "login succeeded"
        );
        self.session = Some(session.clone());
        Ok(session)
    }

    /// Drop the current session and its persisted copy. Idempotent.
    pub fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!(session_id = %session.session_id, "logged out");
        }
        if let Err(err) = self.storage.remove(SESSION_KEY) {
            tracing::warn!(error = %err, "failed to remove persisted session");
        }
    }

    pub fn check_permission(&self, permission: Permission) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.has_permission(permission))
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn current(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_restored(&self) -> bool {
        self.restored
    }

    pub fn phase(&self) -> AuthPhase {
        if !self.restored {
            AuthPhase::Restoring
        } else if self.login_pending {
            AuthPhase::LoggingIn
        } else {
            AuthPhase::Ready
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase() != AuthPhase::Ready
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        AuthSnapshot {
            phase: self.phase(),
            session: self.session.clone(),
        }
    }
}

fn decode_session(raw: &str) -> Result<Session, AuthError> {
    serde_json::from_str(raw).map_err(|e| AuthError::StorageCorrupt(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DemoAuthenticator, MemoryStore, PermissionSet, DEMO_EMAIL, DEMO_PASSWORD};

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io("quota exceeded".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Io("read-only".to_string()))
        }
    }

    fn demo_login() -> Credentials {
        Credentials::new(DEMO_EMAIL, DEMO_PASSWORD)
    }

    #[test]
    fn starts_restoring_and_unauthenticated() {
        let store = SessionStore::new(MemoryStore::new());
        assert_eq!(store.phase(), AuthPhase::Restoring);
        assert!(store.is_loading());
        assert!(!store.is_authenticated());
        assert!(!store.check_permission(Permission::Admin));
    }

    #[test]
    fn restore_from_empty_storage_is_logged_out() {
        let mut store = SessionStore::new(MemoryStore::new());
        assert_eq!(store.restore(), RestoreOutcome::Empty);
        assert_eq!(store.phase(), AuthPhase::Ready);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn restore_discards_corrupt_record() {
        let storage = MemoryStore::with_entry(SESSION_KEY, "{not json");
        let mut store = SessionStore::new(storage.clone());
        assert_eq!(store.restore(), RestoreOutcome::DiscardedCorrupt);
        assert!(!store.is_authenticated());
        assert_eq!(storage.get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn restore_discards_record_with_unknown_permission() {
        let raw = r#"{"session_id":"0190c5a8-0000-7000-8000-000000000000","user_id":"1",
            "name":"x","email":"x@x.com","role":"r","permissions":["root"],
            "authenticated_at":"2024-01-01T00:00:00Z"}"#;
        let mut store = SessionStore::new(MemoryStore::with_entry(SESSION_KEY, raw));
        assert_eq!(store.restore(), RestoreOutcome::DiscardedCorrupt);
    }

    #[test]
    fn restore_runs_once() {
        let storage = MemoryStore::new();
        let mut store = SessionStore::new(storage.clone());
        store.restore();
        storage.set(SESSION_KEY, "garbage").unwrap();
        assert_eq!(store.restore(), RestoreOutcome::AlreadyRestored);
        assert_eq!(storage.get(SESSION_KEY).unwrap().as_deref(), Some("garbage"));
    }

    #[test]
    fn unreadable_storage_means_logged_out() {
        let mut store = SessionStore::new(FailingStore);
        assert_eq!(store.restore(), RestoreOutcome::StorageUnavailable);
        assert!(!store.is_loading());
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn demo_login_persists_full_permission_set() {
        let storage = MemoryStore::new();
        let mut store = SessionStore::new(storage.clone());
        store.restore();

        let session = store.login(&DemoAuthenticator::default(), &demo_login()).await.unwrap();
        assert_eq!(session.permissions, PermissionSet::all());
        assert!(store.check_permission(Permission::Hr));

        let raw = storage.get(SESSION_KEY).unwrap().unwrap();
        let persisted: Session = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, session);

        let mut reloaded = SessionStore::new(storage);
        assert_eq!(reloaded.restore(), RestoreOutcome::Restored);
        assert_eq!(reloaded.current(), Some(&session));
    }

    #[tokio::test]
    async fn rejected_login_keeps_prior_session_and_storage() {
        let storage = MemoryStore::new();
        let mut store = SessionStore::new(storage.clone());
        store.restore();
        let first = store.login(&DemoAuthenticator::default(), &demo_login()).await.unwrap();
        let before = storage.get(SESSION_KEY).unwrap();

        let err = store
            .login(&DemoAuthenticator::default(), &Credentials::new("x@x.com", "wrong"))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::CredentialRejected);
        assert_eq!(store.current(), Some(&first));
        assert_eq!(storage.get(SESSION_KEY).unwrap(), before);
        assert_eq!(store.phase(), AuthPhase::Ready);
    }

    #[tokio::test]
    async fn rejected_login_from_logged_out_leaves_storage_empty() {
        let storage = MemoryStore::new();
        let mut store = SessionStore::new(storage.clone());
        store.restore();
        let result = store
            .login(&DemoAuthenticator::default(), &Credentials::new(DEMO_EMAIL, "nope"))
            .await;
        assert!(result.is_err());
        assert!(storage.is_empty());
    }

    #[test]
    fn failed_persist_leaves_session_unchanged() {
        let mut store = SessionStore::new(FailingStore);
        store.restore();
        store.begin_login().unwrap();
        let grant = DemoAuthenticator::default();
        let grant = block_on(grant.authenticate(&demo_login())).unwrap();
        let err = store.complete_login(Ok(grant)).unwrap_err();
        assert!(matches!(err, AuthError::Storage(StorageError::Io(_))));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn pending_login_reports_loading_and_blocks_second_login() {
        let mut store = SessionStore::new(MemoryStore::new());
        store.restore();
        store.begin_login().unwrap();
        assert_eq!(store.phase(), AuthPhase::LoggingIn);
        assert_eq!(store.begin_login(), Err(AuthError::LoginInProgress));
        assert!(store.complete_login(Err(AuthError::CredentialRejected)).is_err());
        assert_eq!(store.phase(), AuthPhase::Ready);
    }

    #[tokio::test]
    async fn logout_is_idempotent_and_clears_storage() {
        let storage = MemoryStore::new();
        let mut store = SessionStore::new(storage.clone());
        store.restore();
        store.logout();
        assert!(!store.is_authenticated());

        store.login(&DemoAuthenticator::default(), &demo_login()).await.unwrap();
        store.logout();
        assert!(!store.is_authenticated());
        assert!(storage.is_empty());

        store.logout();
        assert!(storage.is_empty());
    }

    #[test]
    fn snapshot_mirrors_store() {
        let mut store = SessionStore::new(MemoryStore::new());
        assert!(store.snapshot().is_loading());
        store.restore();
        let snap = store.snapshot();
        assert!(!snap.is_loading());
        assert!(!snap.is_authenticated());
        assert!(!snap.check_permission(Permission::Sales));
    }

    fn block_on<F: core::future::Future>(fut: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(fut)
    }
}
