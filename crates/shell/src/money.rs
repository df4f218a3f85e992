//! Currency display helpers for the payroll screens (USD and ZIG).
//!
//! Display only: amounts arrive from the API already computed; nothing here
//! decides tax or conversion policy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Exchange rate used when the API cannot supply one.
pub const DEFAULT_USD_TO_ZIG: f64 = 30.0;

/// `$1,234.50`, negatives as `-$1,234.50`.
pub fn format_usd(amount: f64) -> String {
    let sign = if amount < 0.0 && round2(amount) != 0.0 {
        "-"
    } else {
        ""
    };
    format!("{sign}${}", group_fixed2(amount.abs(), ','))
}

/// `ZIG 1 234.50`, negatives as `ZIG -1 234.50`.
pub fn format_zig(amount: f64) -> String {
    let sign = if amount < 0.0 && round2(amount) != 0.0 {
        "-"
    } else {
        ""
    };
    format!("ZIG {sign}{}", group_fixed2(amount.abs(), ' '))
}

/// Two decimals, thousands grouped with `sep`.
fn group_fixed2(amount: f64, sep: char) -> String {
    let fixed = format!("{amount:.2}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(sep);
        }
        grouped.push(ch);
    }
    format!("{grouped}.{frac_part}")
}

fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// `housingAllowance` -> `housing Allowance`.
pub fn humanize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(ch);
    }
    out.trim().to_string()
}

/// One employee's salary as shown on a payslip, in USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryBreakdown {
    #[serde(rename = "baseSalaryUSD")]
    pub base_salary_usd: f64,
    #[serde(default)]
    pub benefits: BTreeMap<String, f64>,
    #[serde(default)]
    pub deductions: BTreeMap<String, f64>,
    #[serde(default = "default_rate")]
    pub exchange_rate: f64,
}

fn default_rate() -> f64 {
    DEFAULT_USD_TO_ZIG
}

impl SalaryBreakdown {
    pub fn total_benefits(&self) -> f64 {
        self.benefits.values().sum()
    }

    pub fn total_deductions(&self) -> f64 {
        self.deductions.values().sum()
    }

    /// base + benefits.
    pub fn gross_usd(&self) -> f64 {
        self.base_salary_usd + self.total_benefits()
    }

    /// base + benefits - deductions.
    pub fn net_usd(&self) -> f64 {
        self.gross_usd() - self.total_deductions()
    }

    pub fn to_zig(&self, usd: f64) -> f64 {
        usd * self.exchange_rate
    }

    pub fn base_salary_zig(&self) -> f64 {
        self.to_zig(self.base_salary_usd)
    }

    pub fn net_zig(&self) -> f64 {
        self.to_zig(self.net_usd())
    }

    /// Payslip lines: (label, usd, zig); deductions are negative.
    pub fn lines(&self) -> Vec<(String, f64, f64)> {
        let mut lines = vec![(
            "Base Salary".to_string(),
            self.base_salary_usd,
            self.base_salary_zig(),
        )];
        lines.extend(
            self.benefits
                .iter()
                .map(|(k, v)| (humanize_key(k), *v, self.to_zig(*v))),
        );
        lines.extend(
            self.deductions
                .iter()
                .map(|(k, v)| (humanize_key(k), -*v, -self.to_zig(*v))),
        );
        lines.push(("Net Salary".to_string(), self.net_usd(), self.net_zig()));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usd_formatting() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(1234.5), "$1,234.50");
        assert_eq!(format_usd(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_usd(-950.0), "-$950.00");
        assert_eq!(format_usd(-0.001), "$0.00");
    }

    #[test]
    fn zig_formatting() {
        assert_eq!(format_zig(30.0), "ZIG 30.00");
        assert_eq!(format_zig(1234567.8), "ZIG 1 234 567.80");
        assert_eq!(format_zig(-1234.0), "ZIG -1 234.00");
    }

    #[test]
    fn humanizes_camel_case() {
        assert_eq!(humanize_key("housingAllowance"), "housing Allowance");
        assert_eq!(humanize_key("NSSA"), "N S S A");
        assert_eq!(humanize_key("paye"), "paye");
    }

    #[test]
    fn net_is_base_plus_benefits_minus_deductions() {
        let salary = SalaryBreakdown {
            base_salary_usd: 1000.0,
            benefits: BTreeMap::from([("transport".to_string(), 50.0), ("housing".to_string(), 150.0)]),
            deductions: BTreeMap::from([("paye".to_string(), 120.0)]),
            exchange_rate: 30.0,
        };
        assert_eq!(salary.gross_usd(), 1200.0);
        assert_eq!(salary.net_usd(), 1080.0);
        assert_eq!(salary.net_zig(), 32_400.0);
        assert_eq!(salary.base_salary_zig(), 30_000.0);

        let lines = salary.lines();
        assert_eq!(lines.first().unwrap().0, "Base Salary");
        assert_eq!(lines.last().unwrap(), &("Net Salary".to_string(), 1080.0, 32_400.0));
        assert!(lines.iter().any(|(label, usd, _)| label == "paye" && *usd == -120.0));
    }

    #[test]
    fn api_shape_deserializes_with_defaults() {
        let salary: SalaryBreakdown = serde_json::from_str(r#"{"baseSalaryUSD": 500}"#).unwrap();
        assert_eq!(salary.exchange_rate, DEFAULT_USD_TO_ZIG);
        assert_eq!(salary.net_usd(), 500.0);
    }
}
