//! Reactive wrappers around the session store.
//!
//! The store itself is plain Rust; components see it through an
//! `AuthSnapshot` signal that is refreshed after every mutation.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use leptos::*;

use erpdesk_auth::{
    AuthError, AuthSnapshot, Authenticator, Credentials, DemoAuthenticator, Session, SessionStore,
};

use crate::api::ApiClient;
use crate::config::ShellConfig;
use crate::guard::ReturnPath;
use crate::nav::NavShell;
use crate::notify::{Notification, Notifier};
use crate::storage::BrowserStore;

const TOAST_LIFETIME: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub notification: Notification,
}

/// Notifier that queues toasts and drops them after a few seconds.
#[derive(Clone)]
pub struct ToastNotifier {
    pub toasts: RwSignal<Vec<Toast>>,
    next_id: Rc<Cell<u64>>,
}

impl ToastNotifier {
    fn new() -> Self {
        Self {
            toasts: create_rw_signal(Vec::new()),
            next_id: Rc::new(Cell::new(0)),
        }
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|list| list.retain(|t| t.id != id));
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, notification: Notification) {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.toasts.update(|list| list.push(Toast { id, notification }));

        let toasts = self.toasts;
        set_timeout(
            move || toasts.update(|list| list.retain(|t| t.id != id)),
            TOAST_LIFETIME,
        );
    }
}

#[derive(Clone)]
pub struct AuthContext {
    store: Rc<RefCell<SessionStore<BrowserStore>>>,
    authenticator: Rc<DemoAuthenticator>,
    pub notifier: ToastNotifier,
    pub snapshot: RwSignal<AuthSnapshot>,
    /// Origin of the last redirect to login, consumed after login.
    pub return_to: RwSignal<ReturnPath>,
}

impl AuthContext {
    fn new(config: &ShellConfig) -> Self {
        let mut store = SessionStore::new(BrowserStore);
        let outcome = store.restore();
        tracing::debug!(?outcome, "session restored");
        let snapshot = create_rw_signal(store.snapshot());

        Self {
            store: Rc::new(RefCell::new(store)),
            authenticator: Rc::new(config.authenticator()),
            notifier: ToastNotifier::new(),
            snapshot,
            return_to: create_rw_signal(ReturnPath::default()),
        }
    }

    fn refresh(&self) {
        let snapshot = self.store.borrow().snapshot();
        self.snapshot.set(snapshot);
    }

    /// No `RefCell` borrow is held across the verification await, so the
    /// UI can keep reading the snapshot while it runs.
    pub async fn login(&self, credentials: Credentials) -> Result<Session, AuthError> {
        self.store.borrow_mut().begin_login()?;
        self.refresh();

        let result = self.authenticator.authenticate(&credentials).await;
        let outcome = self.store.borrow_mut().complete_login(result);
        self.refresh();

        self.notifier.notify(match &outcome {
            Ok(_) => Notification::login_succeeded(),
            Err(AuthError::CredentialRejected) => Notification::login_rejected(),
            Err(_) => Notification::login_failed(),
        });
        outcome
    }

    pub fn logout(&self) {
        self.return_to.update(ReturnPath::forget_on_logout);
        self.store.borrow_mut().logout();
        self.refresh();
        self.notifier.notify(Notification::logged_out());
    }
}

/// Menu state shared by every page; created once so route changes keep it.
#[derive(Debug, Clone, Copy)]
pub struct NavContext(pub RwSignal<NavShell>);

/// Create the auth, navigation and API contexts for the app root.
pub fn provide_app_context(config: ShellConfig) -> AuthContext {
    let auth = AuthContext::new(&config);
    provide_context(auth.clone());
    provide_context(NavContext(create_rw_signal(NavShell::new())));
    provide_context(ApiClient::new(config.api_url));
    auth
}

pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

pub fn use_nav() -> RwSignal<NavShell> {
    expect_context::<NavContext>().0
}

pub fn use_api() -> ApiClient {
    expect_context::<ApiClient>()
}
