//! Pages. Module pages pick their sub-view from the URL fragment; sub-views
//! without a dedicated screen show a titled placeholder.

use std::collections::BTreeSet;

use chrono::Utc;
use leptos::*;
use leptos_router::*;

use erpdesk_auth::{AuthPhase, Credentials};

use crate::api::{EmployeeSummary, PayrollPeriod, SystemUser};
use crate::frontend::context::{use_api, use_auth, use_nav};
use crate::frontend::download::save_csv;
use crate::guard::index_redirect;
use crate::money::{format_usd, format_zig};
use crate::nav::{self, tab_title};
use crate::notify::{Notification, Notifier};
use crate::payroll::{self, find_record, payslip_lines, PayrollFilters, PayrollRun, PayrollSummary, ALL_DEPARTMENTS};
use crate::routes::{AppRoute, DEFAULT_ROUTE};
use crate::table::{self, matches_search, ChoiceFilter, DEFAULT_PAGE_SIZE};
use crate::tabs::{
    AccountingView, HrView, InventoryView, OpenTab, PayrollView, ProcurementView, SettingsView,
};

fn replace() -> NavigateOptions {
    NavigateOptions {
        replace: true,
        ..Default::default()
    }
}

/// The open tab as held by the shared menu state.
fn use_open_tab() -> Memo<OpenTab> {
    let shell = use_nav();
    create_memo(move |_| shell.with(|s| s.open_tab()))
}

/// `/` forwards to the dashboard or the login page once restore is done.
#[component]
pub fn IndexRedirect() -> impl IntoView {
    let snapshot = use_auth().snapshot;
    let navigate = use_navigate();

    create_effect(move |_| {
        if let Some(target) = index_redirect(&snapshot.get()) {
            navigate(target, replace());
        }
    });

    view! { <div class="route-loading">"Loading..."</div> }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let snapshot = auth.snapshot;
    let return_to = auth.return_to;

    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());

    // Covers both an existing session and a login that just succeeded.
    create_effect(move |_| {
        let current = snapshot.get();
        if !current.is_loading() && current.is_authenticated() {
            let target = return_to
                .try_update_untracked(|r| r.take_target())
                .unwrap_or_else(|| DEFAULT_ROUTE.to_string());
            navigate(&target, replace());
        }
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let auth = auth.clone();
        let credentials = Credentials::new(email.get_untracked(), password.get_untracked());
        spawn_local(async move {
            if auth.login(credentials).await.is_err() {
                password.set(String::new());
            }
        });
    };

    let pending = move || snapshot.with(|s| s.phase == AuthPhase::LoggingIn);

    view! {
        <div class="login">
            <form class="login-card" on:submit=on_submit>
                <h1>"Sign in"</h1>
                <label for="email">"Email"</label>
                <input
                    id="email"
                    type="email"
                    autocomplete="username"
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev))
                />
                <label for="password">"Password"</label>
                <input
                    id="password"
                    type="password"
                    autocomplete="current-password"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
                <button type="submit" disabled=pending>
                    {move || if pending() { "Signing in..." } else { "Sign in" }}
                </button>
            </form>
        </div>
    }
}

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="not-found">
            <h1>"404"</h1>
            <p>"The page you are looking for does not exist."</p>
            <A href=DEFAULT_ROUTE>"Back to dashboard"</A>
        </div>
    }
}

#[component]
fn PageHeader(route: AppRoute, #[prop(optional)] tab: Option<Memo<OpenTab>>) -> impl IntoView {
    let subtitle = move || tab.and_then(|t| tab_title(t.get()));
    view! {
        <div class="page-header">
            <h1>{route.title()}</h1>
            {move || subtitle().map(|s| view! { <h2>{s}</h2> })}
        </div>
    }
}

/// Placeholder body for a sub-view that has no dedicated screen yet.
#[component]
fn SubView(tab: OpenTab) -> impl IntoView {
    let title = tab_title(tab).unwrap_or("Overview");
    view! { <section class="sub-view" data-tab=tab.fragment()><p>{title}</p></section> }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let snapshot = use_auth().snapshot;
    let name = move || snapshot.with(|s| s.session.as_ref().map(|s| s.name.clone()));
    let modules = move || {
        nav::visible_for(&snapshot.get())
            .into_iter()
            .filter(|v| v.entry.path != DEFAULT_ROUTE)
            .map(|v| view! { <li><A href=v.entry.path>{v.entry.title}</A></li> })
            .collect_view()
    };

    view! {
        <PageHeader route=AppRoute::Dashboard/>
        <p class="welcome">{move || name().map(|n| format!("Welcome back, {n}"))}</p>
        <ul class="module-cards">{modules}</ul>
    }
}

#[component]
pub fn SalesPage() -> impl IntoView {
    view! {
        <PageHeader route=AppRoute::Sales/>
        <SubView tab=OpenTab::None/>
    }
}

#[component]
pub fn HrPage() -> impl IntoView {
    let tab = use_open_tab();
    view! {
        <PageHeader route=AppRoute::Hr tab=tab/>
        {move || match HrView::from_tab(&tab.get()) {
            HrView::Employees => view! { <EmployeesView/> }.into_view(),
            view => view! { <SubView tab=OpenTab::from(view)/> }.into_view(),
        }}
    }
}

#[component]
pub fn PayrollPage() -> impl IntoView {
    let tab = use_open_tab();
    view! {
        <PageHeader route=AppRoute::Payroll tab=tab/>
        {move || match PayrollView::from_tab(&tab.get()) {
            PayrollView::Dashboard => view! { <PayrollRunView/> }.into_view(),
            PayrollView::Payslips => view! { <PayslipsView/> }.into_view(),
            view => view! { <SubView tab=OpenTab::from(view)/> }.into_view(),
        }}
    }
}

#[component]
pub fn AccountingPage() -> impl IntoView {
    let tab = use_open_tab();
    view! {
        <PageHeader route=AppRoute::Accounting tab=tab/>
        {move || {
            let view = AccountingView::from_tab(&tab.get());
            view! { <SubView tab=OpenTab::from(view)/> }
        }}
    }
}

#[component]
pub fn ProcurementPage() -> impl IntoView {
    let tab = use_open_tab();
    view! {
        <PageHeader route=AppRoute::Procurement tab=tab/>
        {move || {
            let view = ProcurementView::from_tab(&tab.get());
            view! { <SubView tab=OpenTab::from(view)/> }
        }}
    }
}

#[component]
pub fn InventoryPage() -> impl IntoView {
    let tab = use_open_tab();
    view! {
        <PageHeader route=AppRoute::Inventory tab=tab/>
        {move || {
            let view = InventoryView::from_tab(&tab.get());
            view! { <SubView tab=OpenTab::from(view)/> }
        }}
    }
}

#[component]
pub fn SettingsPage() -> impl IntoView {
    let tab = use_open_tab();
    view! {
        <PageHeader route=AppRoute::Settings tab=tab/>
        {move || match SettingsView::from_tab(&tab.get()) {
            SettingsView::Users => view! { <UsersView/> }.into_view(),
            view => view! { <SubView tab=OpenTab::from(view)/> }.into_view(),
        }}
    }
}

/// System users with client-side search and pagination.
#[component]
fn UsersView() -> impl IntoView {
    let api = use_api();
    let search = create_rw_signal(String::new());
    let page = create_rw_signal(1usize);

    let users = create_local_resource(
        || (),
        move |_| {
            let api = api.clone();
            async move { api.fetch_users().await.map_err(|e| e.to_string()) }
        },
    );

    let rows = move || {
        users.get().map(|result| match result {
            Err(message) => view! { <p class="error">{message}</p> }.into_view(),
            Ok(list) => {
                let term = search.get();
                let filtered: Vec<SystemUser> = list
                    .into_iter()
                    .filter(|u| matches_search(&term, [u.name.as_str(), u.email.as_str(), u.role.as_str()]))
                    .collect();
                let current = table::paginate(&filtered, page.get(), DEFAULT_PAGE_SIZE);
                let (has_previous, has_next) = (current.has_previous(), current.has_next());
                let (number, total) = (current.page, current.total_pages.max(1));

                view! {
                    <table>
                        <thead>
                            <tr><th>"Name"</th><th>"Email"</th><th>"Role"</th></tr>
                        </thead>
                        <tbody>
                            {current.items.into_iter().map(|u| view! {
                                <tr><td>{u.name}</td><td>{u.email}</td><td>{u.role}</td></tr>
                            }).collect_view()}
                        </tbody>
                    </table>
                    <div class="pagination">
                        <button disabled=!has_previous on:click=move |_| page.update(|p| *p = p.saturating_sub(1).max(1))>
                            "Previous"
                        </button>
                        <span>{format!("Page {number} of {total}")}</span>
                        <button disabled=!has_next on:click=move |_| page.update(|p| *p += 1)>
                            "Next"
                        </button>
                    </div>
                }
                .into_view()
            }
        })
    };

    view! {
        <section class="sub-view users">
            <input
                type="search"
                placeholder="Search users"
                prop:value=move || search.get()
                on:input=move |ev| {
                    search.set(event_target_value(&ev));
                    page.set(1);
                }
            />
            <Suspense fallback=|| view! { <p>"Loading users..."</p> }>{rows}</Suspense>
        </section>
    }
}

/// Employee directory with search and a department filter.
#[component]
fn EmployeesView() -> impl IntoView {
    let api = use_api();
    let search = create_rw_signal(String::new());
    let department = create_rw_signal(ChoiceFilter::new(ALL_DEPARTMENTS));

    let employees = create_local_resource(
        || (),
        move |_| {
            let api = api.clone();
            async move { api.fetch_employees().await.map_err(|e| e.to_string()) }
        },
    );

    let rows = move || {
        employees.get().map(|result| match result {
            Err(message) => view! { <p class="error">{message}</p> }.into_view(),
            Ok(list) => {
                let filter = department.get();
                let departments: BTreeSet<&str> = list.iter().map(|e| e.department.as_str()).collect();
                let options = filter.options(departments);
                let term = search.get();
                let shown: Vec<EmployeeSummary> = list
                    .iter()
                    .filter(|e| filter.matches(&e.department))
                    .filter(|e| matches_search(&term, [e.name.as_str(), e.employee_id.as_str()]))
                    .cloned()
                    .collect();

                view! {
                    <select on:change=move |ev| department.update(|f| f.select(event_target_value(&ev)))>
                        {options.into_iter().map(|o| {
                            let selected = o == filter.selected();
                            view! { <option value=o.clone() selected=selected>{o}</option> }
                        }).collect_view()}
                    </select>
                    <table>
                        <thead>
                            <tr><th>"Employee ID"</th><th>"Name"</th><th>"Department"</th></tr>
                        </thead>
                        <tbody>
                            {shown.into_iter().map(|e| view! {
                                <tr><td>{e.employee_id}</td><td>{e.name}</td><td>{e.department}</td></tr>
                            }).collect_view()}
                        </tbody>
                    </table>
                }
                .into_view()
            }
        })
    };

    view! {
        <section class="sub-view employees">
            <input
                type="search"
                placeholder="Search employees"
                prop:value=move || search.get()
                on:input=move |ev| search.set(event_target_value(&ev))
            />
            <Suspense fallback=|| view! { <p>"Loading employees..."</p> }>{rows}</Suspense>
        </section>
    }
}

fn current_period() -> PayrollPeriod {
    PayrollPeriod::containing(Utc::now().date_naive())
}

#[component]
fn PeriodPicker(period: RwSignal<PayrollPeriod>) -> impl IntoView {
    view! {
        <input
            type="month"
            prop:value=move || period.get().as_query()
            on:change=move |ev| {
                if let Ok(picked) = event_target_value(&ev).parse::<PayrollPeriod>() {
                    period.set(picked);
                }
            }
        />
    }
}

/// One month's payroll: filters, totals, processing and the bank-file export.
#[component]
fn PayrollRunView() -> impl IntoView {
    let api = use_api();
    let notifier = use_auth().notifier;
    let period = create_rw_signal(current_period());
    let filters = create_rw_signal(PayrollFilters::default());
    let processing = create_rw_signal(false);

    let fetch_api = api.clone();
    let run = create_local_resource(
        move || period.get(),
        move |period| {
            let api = fetch_api.clone();
            async move { PayrollRun::load(&api, period).await.map_err(|e| e.to_string()) }
        },
    );

    let on_process = move |_| {
        let api = api.clone();
        let notifier = notifier.clone();
        let period = period.get_untracked();
        processing.set(true);
        spawn_local(async move {
            notifier.notify(match payroll::process(&api, period).await {
                Ok(()) => Notification::success(format!("Payroll for {} processed", period.as_query())),
                Err(e) => Notification::error(format!("Payroll processing failed: {e}")),
            });
            processing.set(false);
            run.refetch();
        });
    };

    let on_export = move |_| {
        let Some(Ok(current)) = run.get_untracked() else {
            return;
        };
        let shown = filters.with_untracked(|f| f.apply(&current.records));
        let file = payroll::export(current.period, &shown);
        if let Err(e) = save_csv(&file.file_name, &file.contents) {
            tracing::warn!(error = ?e, "payroll export failed");
        }
    };

    let body = move || {
        run.get().map(|result| match result {
            Err(message) => view! { <p class="error">{message}</p> }.into_view(),
            Ok(current) => {
                let active = filters.get();
                let departments = active.department_options(&current.records);
                let statuses = active.status_options(&current.records);
                let shown = active.apply(&current.records);
                let summary = PayrollSummary::of(&shown);
                let net_zig = current.to_zig(summary.total_net);

                view! {
                    <div class="filters">
                        <select on:change=move |ev| filters.update(|f| f.department.select(event_target_value(&ev)))>
                            {departments.into_iter().map(|o| {
                                let selected = o == active.department.selected();
                                view! { <option value=o.clone() selected=selected>{o}</option> }
                            }).collect_view()}
                        </select>
                        <select on:change=move |ev| filters.update(|f| f.status.select(event_target_value(&ev)))>
                            {statuses.into_iter().map(|o| {
                                let selected = o == active.status.selected();
                                view! { <option value=o.clone() selected=selected>{o}</option> }
                            }).collect_view()}
                        </select>
                    </div>
                    <div class="summary-cards">
                        <div class="card"><h3>"Gross"</h3><p>{format_usd(summary.total_gross)}</p></div>
                        <div class="card"><h3>"Deductions"</h3><p>{format_usd(summary.total_deductions)}</p></div>
                        <div class="card">
                            <h3>"Net"</h3>
                            <p>{format_usd(summary.total_net)}</p>
                            <p class="secondary">{format_zig(net_zig)}</p>
                        </div>
                        <div class="card"><h3>"Processed"</h3><p>{summary.progress()}</p></div>
                    </div>
                    <table>
                        <thead>
                            <tr>
                                <th>"Employee ID"</th><th>"Name"</th><th>"Department"</th>
                                <th>"Net (USD)"</th><th>"Net (ZIG)"</th><th>"Status"</th>
                            </tr>
                        </thead>
                        <tbody>
                            {shown.into_iter().map(|r| view! {
                                <tr>
                                    <td>{r.employee.employee_id.clone()}</td>
                                    <td>{r.employee.name.clone()}</td>
                                    <td>{r.employee.department.clone()}</td>
                                    <td>{format_usd(r.salary.net_usd())}</td>
                                    <td>{format_zig(r.salary.net_zig())}</td>
                                    <td>{r.status.clone()}</td>
                                </tr>
                            }).collect_view()}
                        </tbody>
                    </table>
                }
                .into_view()
            }
        })
    };

    view! {
        <section class="sub-view payroll-run">
            <div class="toolbar">
                <PeriodPicker period=period/>
                <input
                    type="search"
                    placeholder="Search by name or employee ID"
                    prop:value=move || filters.with(|f| f.search.clone())
                    on:input=move |ev| filters.update(|f| f.search = event_target_value(&ev))
                />
                <button disabled=move || processing.get() on:click=on_process>
                    {move || if processing.get() { "Processing..." } else { "Process Payroll" }}
                </button>
                <button on:click=on_export>"Export CSV"</button>
            </div>
            <Suspense fallback=|| view! { <p>"Loading payroll..."</p> }>{body}</Suspense>
        </section>
    }
}

/// Per-employee payslip for a chosen month.
#[component]
fn PayslipsView() -> impl IntoView {
    let api = use_api();
    let period = create_rw_signal(current_period());
    let selected = create_rw_signal(None::<String>);

    let run = create_local_resource(
        move || period.get(),
        move |period| {
            let api = api.clone();
            async move { PayrollRun::load(&api, period).await.map_err(|e| e.to_string()) }
        },
    );

    let body = move || {
        run.get().map(|result| match result {
            Err(message) => view! { <p class="error">{message}</p> }.into_view(),
            Ok(current) => {
                let slip = selected
                    .get()
                    .and_then(|id| find_record(&current.records, &id).map(payslip_lines));

                view! {
                    <ul class="payslip-employees">
                        {current.records.iter().map(|r| {
                            let id = r.employee.employee_id.clone();
                            let label = format!("{} ({id})", r.employee.name);
                            view! {
                                <li><button on:click=move |_| selected.set(Some(id.clone()))>{label}</button></li>
                            }
                        }).collect_view()}
                    </ul>
                    {slip.map(|lines| view! {
                        <table class="payslip">
                            <thead><tr><th></th><th>"USD"</th><th>"ZIG"</th></tr></thead>
                            <tbody>
                                {lines.into_iter().map(|(label, usd, zig)| view! {
                                    <tr><td>{label}</td><td>{usd}</td><td>{zig}</td></tr>
                                }).collect_view()}
                            </tbody>
                        </table>
                    })}
                }
                .into_view()
            }
        })
    };

    view! {
        <section class="sub-view payslips">
            <PeriodPicker period=period/>
            <Suspense fallback=|| view! { <p>"Loading payslips..."</p> }>{body}</Suspense>
        </section>
    }
}
