//! Route guard: may the requested view render for the current session?
//!
//! The decision is a pure function of the auth snapshot and the route's
//! requirement. Callers re-evaluate it whenever either changes.

use erpdesk_auth::{AuthSnapshot, Permission};
use serde::Serialize;

use crate::routes::{AppRoute, DEFAULT_ROUTE, LOGIN_ROUTE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    /// Startup restore (or a login) is still pending: show a neutral
    /// placeholder and do not redirect yet.
    Loading,
    /// Not authenticated. `from` is where to return after login.
    RedirectToLogin { from: String },
    /// Authenticated but missing the route's permission.
    RedirectToDefault,
    Render,
}

impl GuardDecision {
    /// Where to navigate (with history replace), if anywhere.
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            GuardDecision::RedirectToLogin { .. } => Some(LOGIN_ROUTE),
            GuardDecision::RedirectToDefault => Some(DEFAULT_ROUTE),
            GuardDecision::Loading | GuardDecision::Render => None,
        }
    }

    pub fn renders(&self) -> bool {
        matches!(self, GuardDecision::Render)
    }
}

/// Decide whether `requested_path` may render.
pub fn decide(
    auth: &AuthSnapshot,
    required: Option<Permission>,
    requested_path: &str,
) -> GuardDecision {
    let decision = if auth.is_loading() {
        GuardDecision::Loading
    } else if !auth.is_authenticated() {
        GuardDecision::RedirectToLogin {
            from: requested_path.to_string(),
        }
    } else if required.is_some_and(|p| !auth.check_permission(p)) {
        GuardDecision::RedirectToDefault
    } else {
        GuardDecision::Render
    };

    tracing::debug!(path = requested_path, ?required, ?decision, "route guard");
    decision
}

/// Guard decision for a path using the static route table.
///
/// Unprotected routes (login, index, not-found) always render.
pub fn decide_for_path(auth: &AuthSnapshot, path: &str) -> GuardDecision {
    let route = AppRoute::parse(path);
    if !route.is_protected() {
        return GuardDecision::Render;
    }
    decide(auth, route.required_permission(), path)
}

/// Where `/` sends the user.
pub fn index_redirect(auth: &AuthSnapshot) -> Option<&'static str> {
    if auth.is_loading() {
        None
    } else if auth.is_authenticated() {
        Some(DEFAULT_ROUTE)
    } else {
        Some(LOGIN_ROUTE)
    }
}

/// Where to go after a successful login that was triggered by a redirect.
///
/// Only protected in-app paths are honoured; anything else lands on the
/// default route.
pub fn post_login_target(from: Option<&str>) -> String {
    match from {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => {
            if AppRoute::parse(path).is_protected() {
                path.to_string()
            } else {
                DEFAULT_ROUTE.to_string()
            }
        }
        _ => DEFAULT_ROUTE.to_string(),
    }
}

/// Where to send the user once they have logged in.
///
/// Remembers the origin of the last redirect to login. The redirect that
/// follows an explicit logout is not remembered: logging back in starts on
/// the default route rather than the page the user left.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnPath {
    from: Option<String>,
    skip_next: bool,
}

impl ReturnPath {
    pub fn observe(&mut self, decision: &GuardDecision) {
        if let GuardDecision::RedirectToLogin { from } = decision {
            if std::mem::take(&mut self.skip_next) {
                return;
            }
            self.from = Some(from.clone());
        }
    }

    /// Call before the session is dropped.
    pub fn forget_on_logout(&mut self) {
        self.from = None;
        self.skip_next = true;
    }

    pub fn pending(&self) -> Option<&str> {
        self.from.as_deref()
    }

    /// Consume the remembered origin; see `post_login_target`.
    pub fn take_target(&mut self) -> String {
        self.skip_next = false;
        post_login_target(self.from.take().as_deref())
    }
}
