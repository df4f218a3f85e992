//! Navigation shell: permission-filtered menu and its UI state.
//!
//! The menu table is static. Filtering happens on every call against the
//! permissions passed in, so a session change is reflected immediately.

use erpdesk_auth::{AuthSnapshot, Permission, PermissionSet};
use serde::Serialize;

use crate::tabs::{
    AccountingView, HrView, InventoryView, OpenTab, PayrollView, ProcurementView, SettingsView,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavEntryId {
    Dashboard,
    Hr,
    Payroll,
    Sales,
    Accounting,
    Procurement,
    Inventory,
    Settings,
}

/// Icon names; the front end maps these to glyphs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavIcon {
    LayoutDashboard,
    Users,
    CreditCard,
    ShoppingCart,
    DollarSign,
    FileText,
    Package,
    Settings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavSubEntry {
    pub title: &'static str,
    pub tab: OpenTab,
    pub permission: Permission,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub id: NavEntryId,
    pub title: &'static str,
    pub icon: NavIcon,
    pub path: &'static str,
    pub permission: Permission,
    pub sub_entries: &'static [NavSubEntry],
}

impl NavEntry {
    pub fn is_expandable(&self) -> bool {
        !self.sub_entries.is_empty()
    }

    /// Highlight rule: the current path is this entry's page or lies under it.
    pub fn is_active(&self, current_path: &str) -> bool {
        match current_path.strip_prefix(self.path) {
            Some(rest) => rest.is_empty() || rest.starts_with(['/', '#', '?']),
            None => false,
        }
    }

    /// Entry whose sub-entry opens `tab`.
    pub fn owning(tab: OpenTab) -> Option<&'static NavEntry> {
        NAV_ENTRIES
            .iter()
            .find(|e| e.sub_entries.iter().any(|s| s.tab == tab))
    }
}

const fn sub(title: &'static str, tab: OpenTab, permission: Permission) -> NavSubEntry {
    NavSubEntry {
        title,
        tab,
        permission,
    }
}

pub static NAV_ENTRIES: &[NavEntry] = &[
    NavEntry {
        id: NavEntryId::Dashboard,
        title: "Dashboard",
        icon: NavIcon::LayoutDashboard,
        path: "/dashboard",
        permission: Permission::Admin,
        sub_entries: &[],
    },
    NavEntry {
        id: NavEntryId::Hr,
        title: "HR",
        icon: NavIcon::Users,
        path: "/hr",
        permission: Permission::Hr,
        sub_entries: &[
            sub("Employees", OpenTab::Hr(HrView::Employees), Permission::Hr),
            sub("Attendance", OpenTab::Hr(HrView::Attendance), Permission::Hr),
            sub("Recruitment", OpenTab::Hr(HrView::Recruitment), Permission::Hr),
            sub("Performance Management", OpenTab::Hr(HrView::Performance), Permission::Hr),
            sub("Training & Development", OpenTab::Hr(HrView::Training), Permission::Hr),
        ],
    },
    NavEntry {
        id: NavEntryId::Payroll,
        title: "Payroll",
        icon: NavIcon::CreditCard,
        path: "/payroll",
        permission: Permission::Hr,
        sub_entries: &[
            sub("Employee Information", OpenTab::Payroll(PayrollView::EmployeeInfo), Permission::Hr),
            sub("Payroll Setup", OpenTab::Payroll(PayrollView::Setup), Permission::Hr),
            sub("Payslip Generation", OpenTab::Payroll(PayrollView::Payslips), Permission::Hr),
            sub("Attendance & Time Tracking", OpenTab::Payroll(PayrollView::Attendance), Permission::Hr),
            sub("Earnings & Deductions", OpenTab::Payroll(PayrollView::EarningsDeductions), Permission::Hr),
            sub("Statutory Contributions", OpenTab::Payroll(PayrollView::Contributions), Permission::Hr),
        ],
    },
    NavEntry {
        id: NavEntryId::Sales,
        title: "Sales",
        icon: NavIcon::ShoppingCart,
        path: "/sales",
        permission: Permission::Sales,
        sub_entries: &[],
    },
    NavEntry {
        id: NavEntryId::Accounting,
        title: "Accounting",
        icon: NavIcon::DollarSign,
        path: "/accounting",
        permission: Permission::Accounting,
        sub_entries: &[
            sub("General Ledger", OpenTab::Accounting(AccountingView::GeneralLedger), Permission::Accounting),
            sub("Currencies", OpenTab::Accounting(AccountingView::Currencies), Permission::Accounting),
            sub("Accounts Payable", OpenTab::Accounting(AccountingView::Payable), Permission::Accounting),
            sub("Accounts Receivable", OpenTab::Accounting(AccountingView::Receivable), Permission::Accounting),
            sub("Financial Reports", OpenTab::Accounting(AccountingView::Reports), Permission::Accounting),
            sub("Tax Management", OpenTab::Accounting(AccountingView::Tax), Permission::Accounting),
        ],
    },
    NavEntry {
        id: NavEntryId::Procurement,
        title: "Procurement",
        icon: NavIcon::FileText,
        path: "/procurement",
        permission: Permission::Procurement,
        sub_entries: &[
            sub("Orders", OpenTab::Procurement(ProcurementView::Orders), Permission::Procurement),
            sub("Suppliers", OpenTab::Procurement(ProcurementView::Suppliers), Permission::Procurement),
            sub("Reports", OpenTab::Procurement(ProcurementView::Reports), Permission::Procurement),
        ],
    },
    NavEntry {
        id: NavEntryId::Inventory,
        title: "Inventory",
        icon: NavIcon::Package,
        path: "/inventory",
        permission: Permission::Inventory,
        sub_entries: &[
            sub("Stock", OpenTab::Inventory(InventoryView::Stock), Permission::Inventory),
            sub("Categories", OpenTab::Inventory(InventoryView::Categories), Permission::Inventory),
            sub("Movements", OpenTab::Inventory(InventoryView::Movements), Permission::Inventory),
        ],
    },
    NavEntry {
        id: NavEntryId::Settings,
        title: "Settings",
        icon: NavIcon::Settings,
        path: "/settings",
        permission: Permission::Admin,
        sub_entries: &[
            sub("General", OpenTab::Settings(SettingsView::General), Permission::Admin),
            sub("Users", OpenTab::Settings(SettingsView::Users), Permission::Admin),
            sub("Permissions", OpenTab::Settings(SettingsView::Permissions), Permission::Admin),
        ],
    },
];

pub fn entry(id: NavEntryId) -> &'static NavEntry {
    NAV_ENTRIES
        .iter()
        .find(|e| e.id == id)
        .unwrap_or(&NAV_ENTRIES[0])
}

/// Menu title of the sub-entry that opens `tab`.
pub fn tab_title(tab: OpenTab) -> Option<&'static str> {
    NAV_ENTRIES
        .iter()
        .flat_map(|e| e.sub_entries.iter())
        .find(|s| s.tab == tab)
        .map(|s| s.title)
}

/// A top-level entry together with the sub-entries the session may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleEntry {
    pub entry: &'static NavEntry,
    pub sub_entries: Vec<&'static NavSubEntry>,
}

/// Filter the menu: entries and, independently, sub-entries whose tag is
/// held by `permissions`.
pub fn visible_entries(permissions: &PermissionSet) -> Vec<VisibleEntry> {
    NAV_ENTRIES
        .iter()
        .filter(|e| permissions.contains(e.permission))
        .map(|entry| VisibleEntry {
            entry,
            sub_entries: entry
                .sub_entries
                .iter()
                .filter(|s| permissions.contains(s.permission))
                .collect(),
        })
        .collect()
}

/// Menu for the current auth state; empty without a session.
pub fn visible_for(auth: &AuthSnapshot) -> Vec<VisibleEntry> {
    match &auth.session {
        Some(session) => visible_entries(&session.permissions),
        None => Vec::new(),
    }
}

/// Result of a menu interaction the router must carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavCommand {
    Navigate(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Viewport {
    Wide,
    /// Menu is shown as an overlay that closes after a selection.
    Narrow,
}

/// Mutable menu state: at most one expanded entry, plus the open tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavShell {
    expanded: Option<NavEntryId>,
    open_tab: OpenTab,
    mobile_menu_open: bool,
    collapsed: bool,
}

impl NavShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shell state for an application start at `fragment` (deep link).
    pub fn from_fragment(fragment: &str) -> Self {
        let mut shell = Self::new();
        shell.sync_fragment(fragment);
        shell
    }

    pub fn expanded(&self) -> Option<NavEntryId> {
        self.expanded
    }

    pub fn is_expanded(&self, id: NavEntryId) -> bool {
        self.expanded == Some(id)
    }

    pub fn open_tab(&self) -> OpenTab {
        self.open_tab
    }

    pub fn is_mobile_menu_open(&self) -> bool {
        self.mobile_menu_open
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Click on a top-level entry.
    ///
    /// Always navigates to the entry's page and clears the open tab. An
    /// expandable entry toggles open, collapsing whichever entry was open
    /// before. In a collapsed sidebar the entry becomes the expanded one
    /// without toggling, so un-collapsing shows the current module.
    pub fn select_entry(&mut self, id: NavEntryId) -> NavCommand {
        let target = entry(id);
        self.open_tab = OpenTab::None;

        if target.is_expandable() && self.collapsed {
            self.expanded = Some(id);
        } else if target.is_expandable() {
            self.expanded = if self.expanded == Some(id) {
                None
            } else {
                Some(id)
            };
        } else {
            self.expanded = None;
            self.mobile_menu_open = false;
        }

        NavCommand::Navigate(target.path.to_string())
    }

    /// Click on a sub-entry.
    pub fn select_sub_entry(
        &mut self,
        parent: NavEntryId,
        tab: OpenTab,
        viewport: Viewport,
    ) -> NavCommand {
        let parent = entry(parent);
        self.open_tab = tab;
        if viewport == Viewport::Narrow {
            self.mobile_menu_open = false;
        }
        NavCommand::Navigate(format!("{}{}", parent.path, tab.fragment()))
    }

    /// Follow the URL fragment (application start, back/forward, manual edit).
    pub fn sync_fragment(&mut self, fragment: &str) {
        self.open_tab = OpenTab::parse(fragment);
    }

    /// Follow a location change. Expansion and collapse survive; a
    /// fragment naming a sub-entry expands its parent.
    pub fn sync_location(&mut self, path: &str, fragment: &str) {
        self.sync_fragment(fragment);
        if let Some(owner) = NavEntry::owning(self.open_tab) {
            if owner.is_active(path) {
                self.expanded = Some(owner.id);
            }
        }
    }

    pub fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
    }

    pub fn open_mobile_menu(&mut self) {
        self.mobile_menu_open = true;
    }

    pub fn close_mobile_menu(&mut self) {
        self.mobile_menu_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn permission_set() -> impl Strategy<Value = PermissionSet> {
        prop::collection::vec(prop::sample::select(Permission::ALL.to_vec()), 0..6)
            .prop_map(|v| v.into_iter().collect())
    }

    #[test]
    fn full_set_sees_everything() {
        let visible = visible_entries(&PermissionSet::all());
        assert_eq!(visible.len(), NAV_ENTRIES.len());
        for v in &visible {
            assert_eq!(v.sub_entries.len(), v.entry.sub_entries.len());
        }
    }

    #[test]
    fn hr_only_sees_hr_and_payroll() {
        let visible = visible_entries(&PermissionSet::from([Permission::Hr]));
        let ids: Vec<_> = visible.iter().map(|v| v.entry.id).collect();
        assert_eq!(ids, vec![NavEntryId::Hr, NavEntryId::Payroll]);
    }

    #[test]
    fn tab_titles_come_from_the_menu() {
        assert_eq!(tab_title(OpenTab::Hr(HrView::Attendance)), Some("Attendance"));
        assert_eq!(
            tab_title(OpenTab::Accounting(AccountingView::GeneralLedger)),
            Some("General Ledger")
        );
        assert_eq!(tab_title(OpenTab::Hr(HrView::Dashboard)), None);
        assert_eq!(tab_title(OpenTab::None), None);
    }

    #[test]
    fn active_entry_matches_whole_segments() {
        let hr = entry(NavEntryId::Hr);
        assert!(hr.is_active("/hr"));
        assert!(hr.is_active("/hr#hr-attendance"));
        assert!(hr.is_active("/hr/employees"));
        assert!(!hr.is_active("/hrx"));
        assert!(!hr.is_active("/payroll"));
    }

    #[test]
    fn collapsed_selection_replaces_the_expanded_entry() {
        let mut shell = NavShell::new();
        shell.select_entry(NavEntryId::Hr);
        shell.toggle_collapsed();
        assert_eq!(
            shell.select_entry(NavEntryId::Accounting),
            NavCommand::Navigate("/accounting".to_string())
        );
        shell.toggle_collapsed();
        assert_eq!(shell.expanded(), Some(NavEntryId::Accounting));

        // Re-selecting while collapsed does not toggle it shut.
        shell.toggle_collapsed();
        shell.select_entry(NavEntryId::Accounting);
        assert_eq!(shell.expanded(), Some(NavEntryId::Accounting));
    }

    #[test]
    fn location_change_keeps_menu_state() {
        let mut shell = NavShell::new();
        shell.select_entry(NavEntryId::Hr);
        shell.open_mobile_menu();
        shell.sync_location("/hr", "");
        assert!(shell.is_expanded(NavEntryId::Hr));
        assert!(shell.is_mobile_menu_open());

        shell.toggle_collapsed();
        shell.sync_location("/sales", "");
        assert!(shell.is_collapsed());
        assert!(shell.is_expanded(NavEntryId::Hr));
    }

    #[test]
    fn deep_link_expands_the_owning_entry() {
        let mut shell = NavShell::new();
        shell.sync_location("/payroll", "#payroll-payslips");
        assert_eq!(shell.open_tab(), OpenTab::Payroll(PayrollView::Payslips));
        assert!(shell.is_expanded(NavEntryId::Payroll));

        // A stray fragment on another page does not move the expansion.
        shell.sync_location("/sales", "#hr-attendance");
        assert!(shell.is_expanded(NavEntryId::Payroll));
    }

    #[test]
    fn no_session_no_menu() {
        assert!(visible_for(&AuthSnapshot::restoring()).is_empty());
    }

    #[test]
    fn expansion_is_mutually_exclusive() {
        let mut shell = NavShell::new();
        assert_eq!(
            shell.select_entry(NavEntryId::Hr),
            NavCommand::Navigate("/hr".to_string())
        );
        assert!(shell.is_expanded(NavEntryId::Hr));

        shell.select_entry(NavEntryId::Accounting);
        assert_eq!(shell.expanded(), Some(NavEntryId::Accounting));
        assert!(!shell.is_expanded(NavEntryId::Hr));

        shell.select_entry(NavEntryId::Accounting);
        assert_eq!(shell.expanded(), None);
    }

    #[test]
    fn leaf_entry_navigates_and_clears_tab() {
        let mut shell = NavShell::from_fragment("#hr-attendance");
        shell.select_entry(NavEntryId::Hr);
        assert_eq!(
            shell.select_entry(NavEntryId::Sales),
            NavCommand::Navigate("/sales".to_string())
        );
        assert_eq!(shell.open_tab(), OpenTab::None);
        assert_eq!(shell.expanded(), None);
    }

    #[test]
    fn sub_entry_sets_tab_and_closes_overlay() {
        let mut shell = NavShell::new();
        shell.open_mobile_menu();
        let tab = OpenTab::Hr(HrView::Attendance);

        let cmd = shell.select_sub_entry(NavEntryId::Hr, tab, Viewport::Wide);
        assert_eq!(cmd, NavCommand::Navigate("/hr#hr-attendance".to_string()));
        assert_eq!(shell.open_tab().fragment(), "#hr-attendance");
        assert!(shell.is_mobile_menu_open());

        shell.select_sub_entry(NavEntryId::Hr, tab, Viewport::Narrow);
        assert!(!shell.is_mobile_menu_open());
    }

    #[test]
    fn deep_link_matches_menu_selection() {
        let mut clicked = NavShell::new();
        clicked.select_sub_entry(NavEntryId::Hr, OpenTab::Hr(HrView::Attendance), Viewport::Wide);
        let linked = NavShell::from_fragment("#hr-attendance");
        assert_eq!(linked.open_tab(), clicked.open_tab());
    }

    #[test]
    fn fragment_changes_outside_the_menu_are_followed() {
        let mut shell = NavShell::from_fragment("#hr-attendance");
        shell.sync_fragment("#hr-employees");
        assert_eq!(shell.open_tab(), OpenTab::Hr(HrView::Employees));
        shell.sync_fragment("");
        assert_eq!(shell.open_tab(), OpenTab::None);
    }

    #[test]
    fn collapsed_sidebar_still_navigates() {
        let mut shell = NavShell::new();
        shell.toggle_collapsed();
        assert_eq!(
            shell.select_entry(NavEntryId::Payroll),
            NavCommand::Navigate("/payroll".to_string())
        );
        assert_eq!(shell.expanded(), Some(NavEntryId::Payroll));
    }

    #[test]
    fn active_entry_uses_path_prefix() {
        assert!(entry(NavEntryId::Inventory).is_active("/inventory/stock"));
        assert!(!entry(NavEntryId::Inventory).is_active("/hr"));
    }

    proptest! {
        #[test]
        fn hidden_entries_require_missing_tags(set in permission_set()) {
            let visible = visible_entries(&set);
            for e in NAV_ENTRIES {
                let shown = visible.iter().find(|v| v.entry.id == e.id);
                prop_assert_eq!(shown.is_some(), set.contains(e.permission));
                if let Some(shown) = shown {
                    for s in &shown.sub_entries {
                        prop_assert!(set.contains(s.permission));
                    }
                }
            }
        }
    }
}
