//! Payroll run screen: filtering, totals, payslips and the bank-file export
//! over the records of one period. Shared by the payroll page and the CLI.

use std::collections::BTreeSet;

use crate::api::{ApiClient, ApiError, PayrollPeriod, PayrollRecord};
use crate::money::{format_usd, format_zig, DEFAULT_USD_TO_ZIG};
use crate::table::{matches_search, to_csv, ChoiceFilter};

pub const ALL_DEPARTMENTS: &str = "All Departments";
pub const ALL_STATUSES: &str = "All Statuses";

pub const EXPORT_HEADERS: [&str; 8] = [
    "Employee ID",
    "Name",
    "Department",
    "Gross (USD)",
    "Deductions (USD)",
    "Net (USD)",
    "Net (ZIG)",
    "Status",
];

/// One period's records plus the rate used for ZIG totals.
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollRun {
    pub period: PayrollPeriod,
    pub records: Vec<PayrollRecord>,
    pub exchange_rate: f64,
}

impl PayrollRun {
    /// Fetch the period's records. A missing exchange rate falls back to
    /// `DEFAULT_USD_TO_ZIG`; missing records fail the load.
    pub async fn load(api: &ApiClient, period: PayrollPeriod) -> Result<Self, ApiError> {
        let records = api.fetch_payroll_records(period).await?;
        let exchange_rate = match api.fetch_exchange_rate().await {
            Ok(rate) => rate.rate,
            Err(e) => {
                tracing::warn!(error = %e, "exchange rate unavailable, using default");
                DEFAULT_USD_TO_ZIG
            }
        };
        Ok(Self {
            period,
            records,
            exchange_rate,
        })
    }

    pub fn to_zig(&self, usd: f64) -> f64 {
        usd * self.exchange_rate
    }
}

/// Validate then process the period; processing is skipped if validation fails.
pub async fn process(api: &ApiClient, period: PayrollPeriod) -> Result<(), ApiError> {
    api.validate_payroll(period).await?;
    api.process_payroll(period).await?;
    tracing::info!(period = %period.as_query(), "payroll processed");
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollFilters {
    pub search: String,
    pub department: ChoiceFilter,
    pub status: ChoiceFilter,
}

impl Default for PayrollFilters {
    fn default() -> Self {
        Self {
            search: String::new(),
            department: ChoiceFilter::new(ALL_DEPARTMENTS),
            status: ChoiceFilter::new(ALL_STATUSES),
        }
    }
}

impl PayrollFilters {
    /// Search covers name and employee id.
    pub fn matches(&self, record: &PayrollRecord) -> bool {
        let employee = &record.employee;
        matches_search(&self.search, [employee.name.as_str(), employee.employee_id.as_str()])
            && self.department.matches(&employee.department)
            && self.status.matches(&record.status)
    }

    pub fn apply(&self, records: &[PayrollRecord]) -> Vec<PayrollRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }

    /// Drop-down options: the "all" label then each department once, sorted.
    pub fn department_options(&self, records: &[PayrollRecord]) -> Vec<String> {
        let departments: BTreeSet<&str> = records
            .iter()
            .map(|r| r.employee.department.as_str())
            .filter(|d| !d.is_empty())
            .collect();
        self.department.options(departments)
    }

    pub fn status_options(&self, records: &[PayrollRecord]) -> Vec<String> {
        let statuses: BTreeSet<&str> = records.iter().map(|r| r.status.as_str()).collect();
        self.status.options(statuses)
    }
}

/// Totals for the summary cards, in USD.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PayrollSummary {
    pub total_gross: f64,
    pub total_deductions: f64,
    pub total_net: f64,
    pub employees: usize,
    pub processed: usize,
}

impl PayrollSummary {
    pub fn of(records: &[PayrollRecord]) -> Self {
        records.iter().fold(Self::default(), |mut acc, r| {
            acc.total_gross += r.salary.gross_usd();
            acc.total_deductions += r.salary.total_deductions();
            acc.total_net += r.salary.net_usd();
            acc.employees += 1;
            if r.is_processed() {
                acc.processed += 1;
            }
            acc
        })
    }

    /// `processed/total`
    pub fn progress(&self) -> String {
        format!("{}/{}", self.processed, self.employees)
    }
}

pub fn find_record<'a>(records: &'a [PayrollRecord], employee_id: &str) -> Option<&'a PayrollRecord> {
    let employee_id = employee_id.trim();
    records
        .iter()
        .find(|r| r.employee.employee_id.eq_ignore_ascii_case(employee_id))
}

/// Payslip rows as displayed: (label, USD, ZIG).
pub fn payslip_lines(record: &PayrollRecord) -> Vec<(String, String, String)> {
    record
        .salary
        .lines()
        .into_iter()
        .map(|(label, usd, zig)| (label, format_usd(usd), format_zig(zig)))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollExport {
    pub file_name: String,
    pub contents: String,
}

/// Bank-file CSV for `records`, named after the period.
pub fn export(period: PayrollPeriod, records: &[PayrollRecord]) -> PayrollExport {
    let rows = records.iter().map(|r| {
        vec![
            r.employee.employee_id.clone(),
            r.employee.name.clone(),
            r.employee.department.clone(),
            format_usd(r.salary.gross_usd()),
            format_usd(r.salary.total_deductions()),
            format_usd(r.salary.net_usd()),
            format_zig(r.salary.net_zig()),
            r.status.clone(),
        ]
    });
    PayrollExport {
        file_name: period.export_file_name(),
        contents: to_csv(&EXPORT_HEADERS, rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::api::EmployeeSummary;
    use crate::money::SalaryBreakdown;

    fn record(id: &str, name: &str, department: &str, base: f64, status: &str) -> PayrollRecord {
        PayrollRecord {
            employee: EmployeeSummary {
                employee_id: id.to_string(),
                name: name.to_string(),
                department: department.to_string(),
            },
            salary: SalaryBreakdown {
                base_salary_usd: base,
                benefits: BTreeMap::from([("transportAllowance".to_string(), 50.0)]),
                deductions: BTreeMap::from([("paye".to_string(), 100.0)]),
                exchange_rate: 30.0,
            },
            status: status.to_string(),
        }
    }

    fn run() -> Vec<PayrollRecord> {
        vec![
            record("EMP-001", "Rudo Moyo", "Finance", 1000.0, "Processed"),
            record("EMP-002", "Tendai Ncube", "IT", 2000.0, "Pending"),
            record("EMP-003", "Farai Dube", "IT", 1500.0, "Processed"),
        ]
    }

    #[test]
    fn default_filters_keep_everything() {
        assert_eq!(PayrollFilters::default().apply(&run()).len(), 3);
    }

    #[test]
    fn filters_combine() {
        let mut filters = PayrollFilters::default();
        filters.department.select("IT");
        assert_eq!(filters.apply(&run()).len(), 2);

        filters.status.select("Processed");
        let kept = filters.apply(&run());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].employee.employee_id, "EMP-003");

        filters.search = "tendai".to_string();
        assert!(filters.apply(&run()).is_empty());
    }

    #[test]
    fn search_matches_employee_id() {
        let filters = PayrollFilters {
            search: "emp-002".to_string(),
            ..PayrollFilters::default()
        };
        assert_eq!(filters.apply(&run())[0].employee.name, "Tendai Ncube");
    }

    #[test]
    fn options_are_deduplicated_and_sorted() {
        let filters = PayrollFilters::default();
        assert_eq!(
            filters.department_options(&run()),
            vec![ALL_DEPARTMENTS, "Finance", "IT"]
        );
        assert_eq!(
            filters.status_options(&run()),
            vec![ALL_STATUSES, "Pending", "Processed"]
        );
    }

    #[test]
    fn summary_totals() {
        let summary = PayrollSummary::of(&run());
        assert_eq!(summary.total_gross, 4650.0);
        assert_eq!(summary.total_deductions, 300.0);
        assert_eq!(summary.total_net, 4350.0);
        assert_eq!(summary.progress(), "2/3");
        assert_eq!(PayrollSummary::of(&[]), PayrollSummary::default());
    }

    #[test]
    fn payslip_is_formatted() {
        let records = run();
        let slip = payslip_lines(find_record(&records, " emp-001 ").unwrap());
        assert_eq!(
            slip.first().unwrap(),
            &("Base Salary".to_string(), "$1,000.00".to_string(), "ZIG 30 000.00".to_string())
        );
        assert!(slip.contains(&(
            "transport Allowance".to_string(),
            "$50.00".to_string(),
            "ZIG 1 500.00".to_string()
        )));
        assert!(slip.contains(&("paye".to_string(), "-$100.00".to_string(), "ZIG -3 000.00".to_string())));
        assert_eq!(
            slip.last().unwrap(),
            &("Net Salary".to_string(), "$950.00".to_string(), "ZIG 28 500.00".to_string())
        );
        assert!(find_record(&records, "EMP-404").is_none());
    }

    #[test]
    fn run_converts_totals_at_its_rate() {
        let current = PayrollRun {
            period: "2024-03".parse().unwrap(),
            records: run(),
            exchange_rate: 25.0,
        };
        let summary = PayrollSummary::of(&current.records);
        assert_eq!(current.to_zig(summary.total_net), 108_750.0);
    }

    #[tokio::test]
    async fn unreachable_backend_fails_load_and_process() {
        let api = ApiClient::new("http://127.0.0.1:9");
        let period: PayrollPeriod = "2024-03".parse().unwrap();
        assert!(matches!(
            PayrollRun::load(&api, period).await,
            Err(ApiError::Network(_))
        ));
        assert!(matches!(process(&api, period).await, Err(ApiError::Network(_))));
    }

    #[test]
    fn export_is_named_after_period() {
        let period: PayrollPeriod = "2024-03".parse().unwrap();
        let out = export(period, &run()[..1]);
        assert_eq!(out.file_name, "payroll_2024_03.csv");
        let mut lines = out.contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "\"Employee ID\",\"Name\",\"Department\",\"Gross (USD)\",\"Deductions (USD)\",\"Net (USD)\",\"Net (ZIG)\",\"Status\""
        );
        assert_eq!(
            lines.next().unwrap(),
            "\"EMP-001\",\"Rudo Moyo\",\"Finance\",\"$1,050.00\",\"$100.00\",\"$950.00\",\"ZIG 28 500.00\",\"Processed\""
        );
        assert!(lines.next().is_none());
    }
}
