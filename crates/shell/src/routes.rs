//! Static route table.

use erpdesk_auth::Permission;

pub const LOGIN_ROUTE: &str = "/login";
pub const DEFAULT_ROUTE: &str = "/dashboard";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AppRoute {
    Index,
    Login,
    Dashboard,
    Sales,
    Accounting,
    Procurement,
    Hr,
    Payroll,
    Inventory,
    Settings,
    NotFound(String),
}

impl AppRoute {
    /// Every page route with a fixed path.
    pub const PAGES: [AppRoute; 9] = [
        AppRoute::Login,
        AppRoute::Dashboard,
        AppRoute::Sales,
        AppRoute::Accounting,
        AppRoute::Procurement,
        AppRoute::Hr,
        AppRoute::Payroll,
        AppRoute::Inventory,
        AppRoute::Settings,
    ];

    /// Resolve a path (query and fragment ignored, trailing slash tolerated).
    ///
    /// Sub-paths resolve to their module page, so `/inventory/stock` is the
    /// inventory route.
    pub fn parse(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');
        if path.is_empty() {
            return AppRoute::Index;
        }

        let first = path
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or_default();

        match first {
            "login" => AppRoute::Login,
            "dashboard" => AppRoute::Dashboard,
            "sales" => AppRoute::Sales,
            "accounting" => AppRoute::Accounting,
            "procurement" => AppRoute::Procurement,
            "hr" => AppRoute::Hr,
            "payroll" => AppRoute::Payroll,
            "inventory" => AppRoute::Inventory,
            "settings" => AppRoute::Settings,
            _ => {
                tracing::warn!(path, "404: no route for requested path");
                AppRoute::NotFound(path.to_string())
            }
        }
    }

    pub fn path(&self) -> &str {
        match self {
            AppRoute::Index => "/",
            AppRoute::Login => LOGIN_ROUTE,
            AppRoute::Dashboard => DEFAULT_ROUTE,
            AppRoute::Sales => "/sales",
            AppRoute::Accounting => "/accounting",
            AppRoute::Procurement => "/procurement",
            AppRoute::Hr => "/hr",
            AppRoute::Payroll => "/payroll",
            AppRoute::Inventory => "/inventory",
            AppRoute::Settings => "/settings",
            AppRoute::NotFound(path) => path,
        }
    }

    /// Whether the route sits behind the guard at all.
    pub fn is_protected(&self) -> bool {
        !matches!(
            self,
            AppRoute::Index | AppRoute::Login | AppRoute::NotFound(_)
        )
    }

    /// Tag required on top of authentication. `Dashboard` needs none.
    pub fn required_permission(&self) -> Option<Permission> {
        match self {
            AppRoute::Sales => Some(Permission::Sales),
            AppRoute::Accounting => Some(Permission::Accounting),
            AppRoute::Procurement => Some(Permission::Procurement),
            AppRoute::Hr | AppRoute::Payroll => Some(Permission::Hr),
            AppRoute::Inventory => Some(Permission::Inventory),
            AppRoute::Settings => Some(Permission::Admin),
            AppRoute::Index | AppRoute::Login | AppRoute::Dashboard | AppRoute::NotFound(_) => {
                None
            }
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AppRoute::Index => "Home",
            AppRoute::Login => "Sign in",
            AppRoute::Dashboard => "Dashboard",
            AppRoute::Sales => "Sales",
            AppRoute::Accounting => "Accounting",
            AppRoute::Procurement => "Procurement",
            AppRoute::Hr => "Human Resources",
            AppRoute::Payroll => "Payroll",
            AppRoute::Inventory => "Inventory",
            AppRoute::Settings => "Settings",
            AppRoute::NotFound(_) => "Page Not Found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_paths_parse_back() {
        for route in AppRoute::PAGES {
            assert_eq!(AppRoute::parse(route.path()), route);
        }
    }

    #[test]
    fn parse_normalizes() {
        assert_eq!(AppRoute::parse("/"), AppRoute::Index);
        assert_eq!(AppRoute::parse(""), AppRoute::Index);
        assert_eq!(AppRoute::parse("/hr/"), AppRoute::Hr);
        assert_eq!(AppRoute::parse("/hr#hr-attendance"), AppRoute::Hr);
        assert_eq!(AppRoute::parse("/sales?page=2"), AppRoute::Sales);
        assert_eq!(AppRoute::parse("/inventory/stock"), AppRoute::Inventory);
        assert_eq!(
            AppRoute::parse("/crm"),
            AppRoute::NotFound("/crm".to_string())
        );
    }

    #[test]
    fn permission_table() {
        assert_eq!(AppRoute::Dashboard.required_permission(), None);
        assert_eq!(AppRoute::Payroll.required_permission(), Some(Permission::Hr));
        assert_eq!(AppRoute::Settings.required_permission(), Some(Permission::Admin));
        assert_eq!(
            AppRoute::Procurement.required_permission(),
            Some(Permission::Procurement)
        );
        assert!(!AppRoute::Login.is_protected());
        assert!(AppRoute::Dashboard.is_protected());
    }
}
