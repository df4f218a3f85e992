//! Main layout: collapsible sidebar, header with the signed-in user, and the
//! toast stack.

use leptos::*;
use leptos_router::*;

use crate::frontend::context::{use_auth, use_nav};
use crate::nav::{self, NavCommand, NavIcon, Viewport};
use crate::notify::NotificationLevel;
use crate::routes::LOGIN_ROUTE;

const NARROW_BREAKPOINT_PX: f64 = 768.0;

fn current_viewport() -> Viewport {
    let width = web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64());
    match width {
        Some(w) if w < NARROW_BREAKPOINT_PX => Viewport::Narrow,
        _ => Viewport::Wide,
    }
}

fn icon_class(icon: NavIcon) -> &'static str {
    match icon {
        NavIcon::LayoutDashboard => "icon icon-layout-dashboard",
        NavIcon::Users => "icon icon-users",
        NavIcon::CreditCard => "icon icon-credit-card",
        NavIcon::ShoppingCart => "icon icon-shopping-cart",
        NavIcon::DollarSign => "icon icon-dollar-sign",
        NavIcon::FileText => "icon icon-file-text",
        NavIcon::Package => "icon icon-package",
        NavIcon::Settings => "icon icon-settings",
    }
}

#[component]
pub fn MainLayout(children: Children) -> impl IntoView {
    let auth = use_auth();
    let location = use_location();
    let navigate = use_navigate();
    let snapshot = auth.snapshot;

    let shell = use_nav();
    create_effect(move |_| {
        let path = location.pathname.get();
        let hash = location.hash.get();
        shell.update(|s| s.sync_location(&path, &hash));
    });

    let menu = create_memo(move |_| nav::visible_for(&snapshot.get()));

    let go = {
        let navigate = navigate.clone();
        move |command: Option<NavCommand>| {
            if let Some(NavCommand::Navigate(path)) = command {
                navigate(&path, Default::default());
            }
        }
    };

    let logout = {
        let auth = auth.clone();
        move |_| {
            auth.logout();
            navigate(
                LOGIN_ROUTE,
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
    };

    let sidebar = move || {
        menu.get()
            .into_iter()
            .map(|visible| {
                let entry = visible.entry;
                let id = entry.id;
                let go_entry = go.clone();
                let sub_entries = visible.sub_entries;
                let go_sub = go.clone();

                let subs = move || {
                    let expanded = shell.with(|s| s.is_expanded(id) && !s.is_collapsed());
                    (expanded && !sub_entries.is_empty()).then(|| {
                        sub_entries
                            .iter()
                            .map(|sub| {
                                let tab = sub.tab;
                                let go_sub = go_sub.clone();
                                view! {
                                    <li
                                        class="nav-sub-entry"
                                        class:active=move || shell.with(|s| s.open_tab() == tab)
                                    >
                                        <button on:click=move |_| {
                                            let viewport = current_viewport();
                                            go_sub(shell.try_update(|s| s.select_sub_entry(id, tab, viewport)));
                                        }>
                                            {sub.title}
                                        </button>
                                    </li>
                                }
                            })
                            .collect_view()
                    })
                };

                view! {
                    <li class="nav-entry" class:active=move || entry.is_active(&location.pathname.get())>
                        <button on:click=move |_| go_entry(shell.try_update(|s| s.select_entry(id)))>
                            <span class=icon_class(entry.icon)></span>
                            <Show when=move || !shell.with(|s| s.is_collapsed())>
                                <span class="label">{entry.title}</span>
                            </Show>
                            {entry.is_expandable().then(|| view! {
                                <span class="chevron" class:open=move || shell.with(|s| s.is_expanded(id))></span>
                            })}
                        </button>
                        <ul class="nav-sub-entries">{subs}</ul>
                    </li>
                }
            })
            .collect_view()
    };

    let user = move || snapshot.with(|s| s.session.clone());

    view! {
        <div class="layout" class:collapsed=move || shell.with(|s| s.is_collapsed())>
            <aside class="sidebar" class:mobile-open=move || shell.with(|s| s.is_mobile_menu_open())>
                <div class="sidebar-header">
                    <span class="brand">"ERP"</span>
                    <button class="collapse-toggle" on:click=move |_| shell.update(|s| s.toggle_collapsed())>
                        <span class="icon icon-menu"></span>
                    </button>
                    <button class="mobile-close" on:click=move |_| shell.update(|s| s.close_mobile_menu())>
                        <span class="icon icon-x"></span>
                    </button>
                </div>
                <nav>
                    <ul class="nav-entries">{sidebar}</ul>
                </nav>
            </aside>
            <Show when=move || shell.with(|s| s.is_mobile_menu_open())>
                <div class="overlay" on:click=move |_| shell.update(|s| s.close_mobile_menu())></div>
            </Show>

            <div class="content">
                <header class="topbar">
                    <button class="mobile-open" on:click=move |_| shell.update(|s| s.open_mobile_menu())>
                        <span class="icon icon-menu"></span>
                    </button>
                    {move || user().map(|session| view! {
                        <div class="user">
                            <span class="avatar">{session.initial().to_string()}</span>
                            <span class="name">{session.name.clone()}</span>
                            <span class="role">{session.role.to_string()}</span>
                        </div>
                    })}
                    <button class="logout" on:click=logout>"Logout"</button>
                </header>
                <main>{children()}</main>
            </div>
        </div>
    }
}

/// Transient notifications, newest last.
#[component]
pub fn Toasts() -> impl IntoView {
    let notifier = use_auth().notifier;
    let toasts = notifier.toasts;

    view! {
        <div class="toasts">
            <For
                each=move || toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let notifier = notifier.clone();
                    let class = match toast.notification.level {
                        NotificationLevel::Success => "toast success",
                        NotificationLevel::Info => "toast info",
                        NotificationLevel::Error => "toast error",
                    };
                    view! {
                        <div class=class on:click=move |_| notifier.dismiss(toast.id)>
                            {toast.notification.message.clone()}
                        </div>
                    }
                }
            />
        </div>
    }
}
