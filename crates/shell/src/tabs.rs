//! Open-tab indicator: which sub-view of a multi-view module page is active.
//!
//! The indicator is driven by the URL fragment. One parser turns a fragment
//! into an `OpenTab`; pages then ask their own view enum to pick a variant
//! (`HrView::from_tab`) instead of comparing strings.
//!
//! Accepted fragment shapes (all equivalent):
//! - `#hr-attendance` (canonical)
//! - `hr-attendance`
//! - `#hr/attendance`
//! - `/hr/attendance`

use serde::{Deserialize, Serialize};

macro_rules! sub_views {
    (
        $(#[$meta:meta])*
        $name:ident, $module:literal {
            default $default:ident => $default_slug:literal;
            $($variant:ident => $slug:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            #[default]
            $default,
            $($variant),+
        }

        impl $name {
            pub const MODULE: &'static str = $module;

            pub const ALL: &'static [$name] = &[$name::$default, $($name::$variant),+];

            pub fn slug(&self) -> &'static str {
                match self {
                    $name::$default => $default_slug,
                    $($name::$variant => $slug),+
                }
            }

            pub fn from_slug(slug: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.slug() == slug)
            }
        }
    };
}

sub_views! {
    /// Views of the HR page.
    HrView, "hr" {
        default Dashboard => "dashboard";
        Employees => "employees",
        Attendance => "attendance",
        Recruitment => "recruitment",
        Performance => "performance",
        Training => "training",
        Payroll => "payroll",
    }
}

sub_views! {
    /// Views of the payroll page.
    PayrollView, "payroll" {
        default Dashboard => "dashboard";
        EmployeeInfo => "employee-info",
        Setup => "setup",
        Payslips => "payslips",
        Attendance => "attendance",
        EarningsDeductions => "earnings-deductions",
        Contributions => "contributions",
    }
}

sub_views! {
    /// Views of the accounting page.
    AccountingView, "accounting" {
        default Dashboard => "dashboard";
        GeneralLedger => "general-ledger",
        Currencies => "currencies",
        Payable => "payable",
        Receivable => "receivable",
        Reports => "reports",
        Tax => "tax",
    }
}

sub_views! {
    ProcurementView, "procurement" {
        default Dashboard => "dashboard";
        Orders => "orders",
        Suppliers => "suppliers",
        Reports => "reports",
    }
}

sub_views! {
    InventoryView, "inventory" {
        default Dashboard => "dashboard";
        Stock => "stock",
        Categories => "categories",
        Movements => "movements",
    }
}

sub_views! {
    SettingsView, "settings" {
        default General => "general";
        Users => "users",
        Permissions => "permissions",
    }
}

/// The currently selected sub-view, if any.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OpenTab {
    #[default]
    None,
    Hr(HrView),
    Payroll(PayrollView),
    Accounting(AccountingView),
    Procurement(ProcurementView),
    Inventory(InventoryView),
    Settings(SettingsView),
}

impl OpenTab {
    /// Parse a URL fragment. Unknown or empty input yields `OpenTab::None`.
    pub fn parse(fragment: &str) -> Self {
        let trimmed = fragment.trim().trim_start_matches(['#', '/']);
        if trimmed.is_empty() {
            return OpenTab::None;
        }
        let lowered = trimmed.to_ascii_lowercase();
        let Some(split) = lowered.find(['-', '/']) else {
            return OpenTab::None;
        };
        let (module, view) = (&lowered[..split], &lowered[split + 1..]);

        let tab = match module {
            HrView::MODULE => HrView::from_slug(view).map(OpenTab::Hr),
            PayrollView::MODULE => PayrollView::from_slug(view).map(OpenTab::Payroll),
            AccountingView::MODULE => AccountingView::from_slug(view).map(OpenTab::Accounting),
            ProcurementView::MODULE => ProcurementView::from_slug(view).map(OpenTab::Procurement),
            InventoryView::MODULE => InventoryView::from_slug(view).map(OpenTab::Inventory),
            SettingsView::MODULE => SettingsView::from_slug(view).map(OpenTab::Settings),
            _ => None,
        };

        tab.unwrap_or_else(|| {
            tracing::debug!(fragment, "unrecognised tab fragment");
            OpenTab::None
        })
    }

    /// Canonical fragment (`#module-view`), empty for `None`.
    pub fn fragment(&self) -> String {
        match self.parts() {
            Some((module, slug)) => format!("#{module}-{slug}"),
            None => String::new(),
        }
    }

    /// Path of the page that renders this tab.
    pub fn page_path(&self) -> Option<&'static str> {
        self.parts().map(|(module, _)| match module {
            "hr" => "/hr",
            "payroll" => "/payroll",
            "accounting" => "/accounting",
            "procurement" => "/procurement",
            "inventory" => "/inventory",
            _ => "/settings",
        })
    }

    pub fn is_none(&self) -> bool {
        matches!(self, OpenTab::None)
    }

    fn parts(&self) -> Option<(&'static str, &'static str)> {
        match self {
            OpenTab::None => None,
            OpenTab::Hr(v) => Some((HrView::MODULE, v.slug())),
            OpenTab::Payroll(v) => Some((PayrollView::MODULE, v.slug())),
            OpenTab::Accounting(v) => Some((AccountingView::MODULE, v.slug())),
            OpenTab::Procurement(v) => Some((ProcurementView::MODULE, v.slug())),
            OpenTab::Inventory(v) => Some((InventoryView::MODULE, v.slug())),
            OpenTab::Settings(v) => Some((SettingsView::MODULE, v.slug())),
        }
    }
}

impl core::fmt::Display for OpenTab {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.fragment())
    }
}

macro_rules! impl_from_tab {
    ($view:ty, $variant:ident) => {
        impl $view {
            /// The view a page should render for `tab`; its default otherwise.
            pub fn from_tab(tab: &OpenTab) -> Self {
                match tab {
                    OpenTab::$variant(view) => *view,
                    _ => Self::default(),
                }
            }
        }

        impl From<$view> for OpenTab {
            fn from(value: $view) -> Self {
                OpenTab::$variant(value)
            }
        }
    };
}

impl_from_tab!(HrView, Hr);
impl_from_tab!(PayrollView, Payroll);
impl_from_tab!(AccountingView, Accounting);
impl_from_tab!(ProcurementView, Procurement);
impl_from_tab!(InventoryView, Inventory);
impl_from_tab!(SettingsView, Settings);

#[cfg(test)]
mod tests {
    use super::*;

    fn every_tab() -> Vec<OpenTab> {
        let mut tabs = vec![OpenTab::None];
        tabs.extend(HrView::ALL.iter().copied().map(OpenTab::from));
        tabs.extend(PayrollView::ALL.iter().copied().map(OpenTab::from));
        tabs.extend(AccountingView::ALL.iter().copied().map(OpenTab::from));
        tabs.extend(ProcurementView::ALL.iter().copied().map(OpenTab::from));
        tabs.extend(InventoryView::ALL.iter().copied().map(OpenTab::from));
        tabs.extend(SettingsView::ALL.iter().copied().map(OpenTab::from));
        tabs
    }

    #[test]
    fn canonical_fragment_parses_back() {
        for tab in every_tab() {
            assert_eq!(OpenTab::parse(&tab.fragment()), tab, "{tab:?}");
        }
    }

    #[test]
    fn hr_attendance_fragment() {
        let tab = OpenTab::parse("#hr-attendance");
        assert_eq!(tab, OpenTab::Hr(HrView::Attendance));
        assert_eq!(tab.fragment(), "#hr-attendance");
        assert_eq!(tab.page_path(), Some("/hr"));
    }

    #[test]
    fn alternate_shapes_are_accepted() {
        assert_eq!(
            OpenTab::parse("#procurement/orders"),
            OpenTab::Procurement(ProcurementView::Orders)
        );
        assert_eq!(
            OpenTab::parse("/inventory/stock"),
            OpenTab::Inventory(InventoryView::Stock)
        );
        assert_eq!(
            OpenTab::parse("payroll-employee-info"),
            OpenTab::Payroll(PayrollView::EmployeeInfo)
        );
        assert_eq!(
            OpenTab::parse("#Accounting-General-Ledger"),
            OpenTab::Accounting(AccountingView::GeneralLedger)
        );
    }

    #[test]
    fn unknown_fragments_yield_none() {
        for raw in ["", "#", "#hr", "#hr-nope", "#crm-leads", "attendance"] {
            assert_eq!(OpenTab::parse(raw), OpenTab::None, "{raw:?}");
        }
        assert_eq!(OpenTab::None.fragment(), "");
    }

    #[test]
    fn pages_fall_back_to_their_default_view() {
        let tab = OpenTab::parse("#payroll-payslips");
        assert_eq!(PayrollView::from_tab(&tab), PayrollView::Payslips);
        assert_eq!(HrView::from_tab(&tab), HrView::Dashboard);
        assert_eq!(SettingsView::from_tab(&OpenTab::None), SettingsView::General);
    }
}
