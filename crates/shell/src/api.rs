//! REST client for the ERP backend.
//!
//! Each call is a single HTTP round trip returning the decoded body. Pages
//! own their loading flag and decide what an error looks like on screen;
//! nothing here retries or caches.

use chrono::{Datelike, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::money::SalaryBreakdown;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}

/// Month a payroll run belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PayrollPeriod {
    year: i32,
    month: u32,
}

impl PayrollPeriod {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// `YYYY-MM`, the form the backend expects.
    pub fn as_query(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// `payroll_YYYY_MM.csv`
    pub fn export_file_name(&self) -> String {
        format!("payroll_{:04}_{:02}.csv", self.year, self.month)
    }
}

impl core::str::FromStr for PayrollPeriod {
    type Err = erpdesk_core::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || erpdesk_core::DomainError::validation(format!("invalid period '{s}'"));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemUser {
    pub id: Value,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub department: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    pub employee_id: String,
    pub name: String,
    #[serde(default)]
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRecord {
    pub employee: EmployeeSummary,
    pub salary: SalaryBreakdown,
    pub status: String,
}

impl PayrollRecord {
    pub fn is_processed(&self) -> bool {
        self.status == "Processed"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub rate: f64,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a backend path (`all/users/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    // ── system users (settings) ──────────────────────────────────────────

    pub async fn fetch_users(&self) -> Result<Vec<SystemUser>, ApiError> {
        self.get("all/users/").await
    }

    // ── HR ───────────────────────────────────────────────────────────────

    pub async fn add_employee(&self, employee: &Value) -> Result<Value, ApiError> {
        self.post("register/employee/", employee).await
    }

    pub async fn fetch_employees(&self) -> Result<Vec<EmployeeSummary>, ApiError> {
        self.get("all/employees/").await
    }

    // ── payroll ──────────────────────────────────────────────────────────

    pub async fn fetch_payroll_records(
        &self,
        period: PayrollPeriod,
    ) -> Result<Vec<PayrollRecord>, ApiError> {
        self.get(&format!("payroll/records/?month={}", period.as_query()))
            .await
    }

    pub async fn validate_payroll(&self, period: PayrollPeriod) -> Result<Value, ApiError> {
        self.post("payroll/validate/", &serde_json::json!({ "month": period.as_query() }))
            .await
    }

    pub async fn process_payroll(&self, period: PayrollPeriod) -> Result<Value, ApiError> {
        self.post("payroll/process/", &serde_json::json!({ "month": period.as_query() }))
            .await
    }

    pub async fn fetch_exchange_rate(&self) -> Result<ExchangeRate, ApiError> {
        self.get("exchange-rate/").await
    }

    // ── plumbing ─────────────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        let resp = self.http.get(&url).send().await;
        self.decode(&url, resp).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let resp = self.http.post(&url).json(body).send().await;
        self.decode(&url, resp).await
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        url: &str,
        resp: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<T, ApiError> {
        let resp = resp.map_err(|e| {
            tracing::warn!(url, error = %e, "request failed");
            ApiError::Network(e.to_string())
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(url, status = status.as_u16(), "API returned an error");
            return Err(ApiError::Api(status.as_u16(), body));
        }

        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = ApiClient::new("http://localhost:8000");
        assert_eq!(client.base_url(), "http://localhost:8000/");
        assert_eq!(client.url("/all/users/"), "http://localhost:8000/all/users/");
        assert_eq!(client.url("get/user/7/"), "http://localhost:8000/get/user/7/");
    }

    #[test]
    fn period_formats() {
        let period: PayrollPeriod = "2024-03".parse().unwrap();
        assert_eq!(period.as_query(), "2024-03");
        assert_eq!(period.export_file_name(), "payroll_2024_03.csv");
        assert!("2024-13".parse::<PayrollPeriod>().is_err());
        assert!("March".parse::<PayrollPeriod>().is_err());

        let date = NaiveDate::from_ymd_opt(2025, 11, 30).unwrap();
        assert_eq!(PayrollPeriod::containing(date).as_query(), "2025-11");
    }

    #[test]
    fn payroll_record_deserializes_backend_shape() {
        let raw = r#"{
            "employee": {"employeeId": "EMP-1", "name": "Rudo", "department": "IT"},
            "salary": {"baseSalaryUSD": 800, "benefits": {"transport": 40},
                       "deductions": {"paye": 90}, "exchangeRate": 25},
            "status": "Processed"
        }"#;
        let record: PayrollRecord = serde_json::from_str(raw).unwrap();
        assert!(record.is_processed());
        assert_eq!(record.salary.net_usd(), 750.0);
        assert_eq!(record.salary.net_zig(), 18_750.0);
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        let client = ApiClient::new("http://127.0.0.1:9");
        let err = client.fetch_users().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)), "{err:?}");
    }
}
