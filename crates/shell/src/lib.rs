//! `erpdesk-shell`
//!
//! **Responsibility:** the application shell around the ERP pages.
//!
//! This crate provides:
//! - Route table and the route guard (`routes`, `guard`)
//! - Permission-filtered navigation menu and open-tab state (`nav`, `tabs`)
//! - Session persistence backends (`storage`) and app wiring (`state`)
//! - REST client and the screens built on it: list helpers, currency
//!   display and the payroll run (`api`, `table`, `money`, `payroll`)
//!
//! Session and permission semantics live in `erpdesk-auth`; this crate only
//! consumes them. The Leptos front end (`frontend`) is compiled for wasm32.

pub mod api;
pub mod config;
pub mod guard;
pub mod money;
pub mod nav;
pub mod notify;
pub mod payroll;
pub mod routes;
pub mod state;
pub mod storage;
pub mod table;
pub mod tabs;

#[cfg(target_arch = "wasm32")]
pub mod frontend;

pub use config::ShellConfig;
pub use guard::{decide, decide_for_path, post_login_target, GuardDecision};
pub use nav::{NavCommand, NavEntryId, NavShell, Viewport, VisibleEntry};
pub use notify::{Notification, NotificationLevel, Notifier};
pub use routes::{AppRoute, DEFAULT_ROUTE, LOGIN_ROUTE};
pub use state::AppState;
pub use tabs::OpenTab;
