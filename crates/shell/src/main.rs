//! Headless driver for the ERP shell.
//!
//! Runs the same session store, guard and navigation logic as the browser
//! front end, persisting the session to a data directory instead of
//! `localStorage`. Handy for checking what a given account can reach.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use anyhow::{bail, Context, Result};
    use clap::{Parser, Subcommand};

    use erpdesk_auth::{explain_authorization, Authenticator, Credentials, KeyValueStore};
    use erpdesk_observability::{LogFormat, ObservabilityConfig};
    use erpdesk_shell::api::{ApiClient, PayrollPeriod};
    use erpdesk_shell::config::ShellConfig;
    use erpdesk_shell::guard::GuardDecision;
    use erpdesk_shell::money::{format_usd, format_zig};
    use erpdesk_shell::notify::{Notifier, TracingNotifier};
    use erpdesk_shell::payroll::{self, PayrollFilters, PayrollRun, PayrollSummary, ALL_DEPARTMENTS};
    use erpdesk_shell::routes::AppRoute;
    use erpdesk_shell::state::AppState;
    use erpdesk_shell::storage::FileStore;
    use erpdesk_shell::table::{self, matches_search, ChoiceFilter, DEFAULT_PAGE_SIZE};
    use erpdesk_shell::tabs::OpenTab;

    #[derive(Parser)]
    #[command(name = "erpdesk")]
    #[command(about = "Headless ERP shell: session, route guard, navigation and payroll")]
    #[command(version)]
    struct Cli {
        #[command(subcommand)]
        command: Commands,

        /// Emit JSON log lines instead of compact text
        #[arg(long, global = true)]
        json_logs: bool,
    }

    #[derive(Subcommand)]
    enum Commands {
        /// Log in and persist the session
        Login {
            email: String,
            password: String,
            /// Path that triggered the login redirect
            #[arg(long)]
            from: Option<String>,
        },
        /// Clear the persisted session
        Logout,
        /// Show the current session
        Whoami,
        /// Print the menu visible to the current session
        Nav,
        /// Print the guard decision for a path
        Route { path: String },
        /// Parse a URL fragment into the open-tab indicator
        Tab { fragment: String },
        /// List system users (settings permission)
        Users {
            #[arg(long, default_value = "")]
            search: String,
            #[arg(long, default_value_t = 1)]
            page: usize,
        },
        /// List employees (HR permission)
        Employees {
            #[arg(long, default_value = "")]
            search: String,
            #[arg(long)]
            department: Option<String>,
        },
        /// Register an employee from a JSON file (HR permission)
        AddEmployee { file: PathBuf },
        /// Show one month's payroll run (payroll permission)
        Payroll {
            /// Month as YYYY-MM
            period: PayrollPeriod,
            #[arg(long, default_value = "")]
            search: String,
            #[arg(long)]
            department: Option<String>,
            #[arg(long)]
            status: Option<String>,
            /// Validate and process the run before listing it
            #[arg(long)]
            process: bool,
            /// Write the bank-file CSV into this directory
            #[arg(long)]
            export: Option<PathBuf>,
        },
        /// Print one employee's payslip (payroll permission)
        Payslip {
            period: PayrollPeriod,
            employee_id: String,
        },
    }

    /// Refuse backend commands the current session could not open in the UI.
    fn require<S, A, N>(app: &AppState<S, A, N>, path: &str) -> Result<()>
    where
        S: KeyValueStore,
        A: Authenticator,
        N: Notifier,
    {
        match app.guard(path) {
            GuardDecision::Render => Ok(()),
            GuardDecision::RedirectToLogin { .. } => bail!("not logged in"),
            other => bail!("{path} is not available to this session ({other:?})"),
        }
    }

    pub async fn run() -> Result<()> {
        let cli = Cli::parse();

        let log_config = if cli.json_logs {
            ObservabilityConfig {
                default_filter: "warn".to_string(),
                format: LogFormat::Json,
            }
        } else {
            ObservabilityConfig::compact("warn")
        };
        erpdesk_observability::init_with(&log_config);

        let config = ShellConfig::from_env();
        let data_dir = config
            .data_dir
            .clone()
            .context("no data directory; set ERPDESK_DATA_DIR")?;
        let storage = FileStore::open(&data_dir)
            .with_context(|| format!("failed to open session store at {}", data_dir.display()))?;

        let mut app = AppState::start(storage, config.authenticator(), TracingNotifier, "");
        let api = ApiClient::new(config.api_url.clone());

        match cli.command {
            Commands::Login {
                email,
                password,
                from,
            } => {
                let next = app
                    .login(&Credentials::new(email, password), from.as_deref())
                    .await
                    .context("login failed")?;
                println!("logged in; continue to {next}");
            }
            Commands::Logout => {
                app.logout();
                println!("logged out");
            }
            Commands::Whoami => match app.session() {
                Some(session) => {
                    println!("{} <{}> ({})", session.name, session.email, session.role);
                    let tags: Vec<&str> = session.permissions.iter().map(|p| p.as_str()).collect();
                    println!("permissions: {}", tags.join(", "));
                    println!("session: {} since {}", session.session_id, session.authenticated_at);
                }
                None => println!("not logged in"),
            },
            Commands::Nav => {
                let menu = app.menu();
                if menu.is_empty() {
                    println!("(no menu: not logged in)");
                }
                for visible in menu {
                    println!("{:<12} {}", visible.entry.title, visible.entry.path);
                    for sub in visible.sub_entries {
                        println!("  - {:<28} {}{}", sub.title, visible.entry.path, sub.tab.fragment());
                    }
                }
            }
            Commands::Route { path } => {
                let decision = app.guard(&path);
                println!("{}", serde_json::to_string(&decision)?);
                if let Some(required) = AppRoute::parse(&path).required_permission() {
                    let explanation = explain_authorization(app.session(), required);
                    println!("{}", serde_json::to_string(&explanation)?);
                }
            }
            Commands::Tab { fragment } => {
                let tab = OpenTab::parse(&fragment);
                if tab.is_none() {
                    println!("(none)");
                } else {
                    println!("{} on {}", tab.fragment(), tab.page_path().unwrap_or("/"));
                }
            }
            Commands::Users { search, page } => {
                require(&app, "/settings")?;
                let users = api.fetch_users().await.context("failed to fetch users")?;
                let matching: Vec<_> = users
                    .into_iter()
                    .filter(|u| matches_search(&search, [u.name.as_str(), u.email.as_str(), u.role.as_str()]))
                    .collect();
                let current = table::paginate(&matching, page, DEFAULT_PAGE_SIZE);
                for user in &current.items {
                    println!("{:<24} {:<32} {}", user.name, user.email, user.role);
                }
                println!(
                    "page {} of {} ({} users)",
                    current.page,
                    current.total_pages.max(1),
                    current.total_items
                );
            }
            Commands::Employees { search, department } => {
                require(&app, "/hr")?;
                let mut filter = ChoiceFilter::new(ALL_DEPARTMENTS);
                if let Some(department) = department {
                    filter.select(department);
                }
                let employees = api.fetch_employees().await.context("failed to fetch employees")?;
                for e in employees.iter().filter(|e| {
                    filter.matches(&e.department)
                        && matches_search(&search, [e.name.as_str(), e.employee_id.as_str()])
                }) {
                    println!("{:<12} {:<24} {}", e.employee_id, e.name, e.department);
                }
            }
            Commands::AddEmployee { file } => {
                require(&app, "/hr")?;
                let raw = std::fs::read_to_string(&file)
                    .with_context(|| format!("failed to read {}", file.display()))?;
                let employee: serde_json::Value =
                    serde_json::from_str(&raw).context("employee file is not valid JSON")?;
                let created = api.add_employee(&employee).await.context("failed to add employee")?;
                println!("{}", serde_json::to_string_pretty(&created)?);
            }
            Commands::Payroll {
                period,
                search,
                department,
                status,
                process,
                export,
            } => {
                require(&app, "/payroll")?;
                if process {
                    payroll::process(&api, period)
                        .await
                        .with_context(|| format!("failed to process payroll for {}", period.as_query()))?;
                    println!("processed payroll for {}", period.as_query());
                }
                let run = PayrollRun::load(&api, period)
                    .await
                    .context("failed to fetch payroll records")?;

                let mut filters = PayrollFilters {
                    search,
                    ..PayrollFilters::default()
                };
                if let Some(department) = department {
                    filters.department.select(department);
                }
                if let Some(status) = status {
                    filters.status.select(status);
                }
                let shown = filters.apply(&run.records);

                for r in &shown {
                    println!(
                        "{:<12} {:<24} {:<16} {:>14} {:>18} {}",
                        r.employee.employee_id,
                        r.employee.name,
                        r.employee.department,
                        format_usd(r.salary.net_usd()),
                        format_zig(r.salary.net_zig()),
                        r.status
                    );
                }
                let summary = PayrollSummary::of(&shown);
                println!(
                    "gross {}  deductions {}  net {} ({})  processed {}",
                    format_usd(summary.total_gross),
                    format_usd(summary.total_deductions),
                    format_usd(summary.total_net),
                    format_zig(run.to_zig(summary.total_net)),
                    summary.progress()
                );

                if let Some(dir) = export {
                    let file = payroll::export(period, &shown);
                    let path = dir.join(&file.file_name);
                    std::fs::write(&path, file.contents)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("exported {}", path.display());
                }
            }
            Commands::Payslip {
                period,
                employee_id,
            } => {
                require(&app, "/payroll")?;
                let run = PayrollRun::load(&api, period)
                    .await
                    .context("failed to fetch payroll records")?;
                let Some(record) = payroll::find_record(&run.records, &employee_id) else {
                    bail!("no payroll record for {employee_id} in {}", period.as_query());
                };
                println!("{} ({}) {}", record.employee.name, record.employee.employee_id, period.as_query());
                for (label, usd, zig) in payroll::payslip_lines(record) {
                    println!("{label:<28} {usd:>14} {zig:>18}");
                }
            }
        }

        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    cli::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {}
