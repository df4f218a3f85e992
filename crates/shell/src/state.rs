//! Application state shared by the headless driver and the tests: the
//! session store, the navigation shell and the notification sink wired
//! together the way a page would use them.

use erpdesk_auth::{
    AuthError, AuthSnapshot, Authenticator, Credentials, KeyValueStore, Permission,
    RestoreOutcome, Session, SessionStore,
};

use crate::guard::{self, GuardDecision, ReturnPath};
use crate::nav::{self, NavCommand, NavEntryId, NavShell, VisibleEntry, Viewport};
use crate::notify::{Notification, Notifier};
use crate::routes::LOGIN_ROUTE;
use crate::tabs::OpenTab;

pub struct AppState<S, A, N> {
    store: SessionStore<S>,
    authenticator: A,
    notifier: N,
    nav: NavShell,
    return_path: ReturnPath,
}

impl<S, A, N> AppState<S, A, N>
where
    S: KeyValueStore,
    A: Authenticator,
    N: Notifier,
{
    /// Application start: restore the session and read the initial fragment.
    pub fn start(storage: S, authenticator: A, notifier: N, initial_fragment: &str) -> Self {
        let mut store = SessionStore::new(storage);
        let outcome = store.restore();
        tracing::debug!(?outcome, "application started");
        Self {
            store,
            authenticator,
            notifier,
            nav: NavShell::from_fragment(initial_fragment),
            return_path: ReturnPath::default(),
        }
    }

    /// Same as `start` but without restoring, for callers that restore later.
    pub fn unrestored(storage: S, authenticator: A, notifier: N) -> Self {
        Self {
            store: SessionStore::new(storage),
            authenticator,
            notifier,
            nav: NavShell::new(),
            return_path: ReturnPath::default(),
        }
    }

    pub fn restore(&mut self) -> RestoreOutcome {
        self.store.restore()
    }

    /// Log in and report the outcome to the user. On success returns the
    /// path to continue to: `from` if given, else the origin of the last
    /// guard redirect seen by `visit`.
    pub async fn login(
        &mut self,
        credentials: &Credentials,
        from: Option<&str>,
    ) -> Result<String, AuthError> {
        match self.store.login(&self.authenticator, credentials).await {
            Ok(_) => {
                self.notifier.notify(Notification::login_succeeded());
                Ok(match from {
                    Some(_) => guard::post_login_target(from),
                    None => self.return_path.take_target(),
                })
            }
            Err(err) => {
                let notification = match err {
                    AuthError::CredentialRejected => Notification::login_rejected(),
                    _ => Notification::login_failed(),
                };
                self.notifier.notify(notification);
                Err(err)
            }
        }
    }

    /// Log out, tell the user, and send them to the login page.
    pub fn logout(&mut self) -> NavCommand {
        self.return_path.forget_on_logout();
        self.store.logout();
        self.notifier.notify(Notification::logged_out());
        NavCommand::Navigate(LOGIN_ROUTE.to_string())
    }

    pub fn guard(&self, path: &str) -> GuardDecision {
        guard::decide_for_path(&self.snapshot(), path)
    }

    /// Navigate to `path`: evaluate the guard and follow the location.
    pub fn visit(&mut self, path: &str) -> GuardDecision {
        let decision = self.guard(path);
        self.return_path.observe(&decision);
        let (page, fragment) = match path.find('#') {
            Some(i) => path.split_at(i),
            None => (path, ""),
        };
        self.nav.sync_location(page, fragment);
        decision
    }

    pub fn menu(&self) -> Vec<VisibleEntry> {
        nav::visible_for(&self.snapshot())
    }

    pub fn select_entry(&mut self, id: NavEntryId) -> NavCommand {
        self.nav.select_entry(id)
    }

    pub fn select_sub_entry(&mut self, parent: NavEntryId, tab: OpenTab, viewport: Viewport) -> NavCommand {
        self.nav.select_sub_entry(parent, tab, viewport)
    }

    pub fn sync_fragment(&mut self, fragment: &str) {
        self.nav.sync_fragment(fragment);
    }

    pub fn open_tab(&self) -> OpenTab {
        self.nav.open_tab()
    }

    pub fn nav(&self) -> &NavShell {
        &self.nav
    }

    pub fn check_permission(&self, permission: Permission) -> bool {
        self.store.check_permission(permission)
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    pub fn session(&self) -> Option<&Session> {
        self.store.current()
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.store.snapshot()
    }
}
