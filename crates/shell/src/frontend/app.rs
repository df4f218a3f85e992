//! Leptos application with routing and the route guard.

use leptos::*;
use leptos_router::*;

use crate::config::ShellConfig;
use crate::frontend::context::{provide_app_context, use_auth};
use crate::frontend::layout::{MainLayout, Toasts};
use crate::frontend::pages::{
    AccountingPage, DashboardPage, HrPage, IndexRedirect, InventoryPage, LoginPage, NotFoundPage,
    PayrollPage, ProcurementPage, SalesPage, SettingsPage,
};
use crate::guard::{self, GuardDecision};
use crate::routes::AppRoute;

/// Main application component.
#[component]
pub fn App() -> impl IntoView {
    provide_app_context(ShellConfig::default());

    view! {
        <Router>
            <Routes>
                <Route path="/" view=IndexRedirect/>
                <Route path="/login" view=LoginPage/>
                <Route path="/dashboard" view=|| view! {
                    <Protected route=AppRoute::Dashboard><DashboardPage/></Protected>
                }/>
                <Route path="/sales" view=|| view! {
                    <Protected route=AppRoute::Sales><SalesPage/></Protected>
                }/>
                <Route path="/accounting" view=|| view! {
                    <Protected route=AppRoute::Accounting><AccountingPage/></Protected>
                }/>
                <Route path="/procurement" view=|| view! {
                    <Protected route=AppRoute::Procurement><ProcurementPage/></Protected>
                }/>
                <Route path="/hr" view=|| view! {
                    <Protected route=AppRoute::Hr><HrPage/></Protected>
                }/>
                <Route path="/payroll" view=|| view! {
                    <Protected route=AppRoute::Payroll><PayrollPage/></Protected>
                }/>
                <Route path="/inventory" view=|| view! {
                    <Protected route=AppRoute::Inventory><InventoryPage/></Protected>
                }/>
                <Route path="/inventory/*any" view=|| view! {
                    <Protected route=AppRoute::Inventory><InventoryPage/></Protected>
                }/>
                <Route path="/settings" view=|| view! {
                    <Protected route=AppRoute::Settings><SettingsPage/></Protected>
                }/>
                <Route path="/*any" view=NotFoundPage/>
            </Routes>
            <Toasts/>
        </Router>
    }
}

/// Renders its page inside the main layout only when the guard allows it.
///
/// The decision is recomputed whenever the session snapshot or the location
/// changes, so a logout elsewhere bounces the user straight to login.
#[component]
fn Protected(route: AppRoute, children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let location = use_location();
    let navigate = use_navigate();
    let required = route.required_permission();
    let snapshot = auth.snapshot;
    let return_to = auth.return_to;

    let decision = create_memo(move |_| {
        let path = format!("{}{}", location.pathname.get(), location.hash.get());
        guard::decide(&snapshot.get(), required, &path)
    });

    create_effect(move |_| {
        let decision = decision.get();
        return_to.update(|r| r.observe(&decision));
        if let Some(target) = decision.redirect_target() {
            navigate(
                target,
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
    });

    let children = store_value(children);

    view! {
        <Show
            when=move || decision.get().renders()
            fallback=move || {
                (decision.get() == GuardDecision::Loading)
                    .then(|| view! { <div class="route-loading">"Loading..."</div> })
            }
        >
            <MainLayout>{children.with_value(|children| children())}</MainLayout>
        </Show>
    }
}
