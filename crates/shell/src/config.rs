//! Shell configuration (environment driven).

use std::path::PathBuf;

use erpdesk_auth::{DemoAuthenticator, DEMO_EMAIL, DEMO_PASSWORD};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Base URL of the REST backend.
    pub api_url: String,
    /// Directory for `FileStore` (native only).
    pub data_dir: Option<PathBuf>,
    pub demo_email: String,
    pub demo_password: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            api_url: option_env!("ERPDESK_API_URL")
                .unwrap_or(DEFAULT_API_URL)
                .to_string(),
            data_dir: default_data_dir(),
            demo_email: DEMO_EMAIL.to_string(),
            demo_password: DEMO_PASSWORD.to_string(),
        }
    }
}

impl ShellConfig {
    /// Read `ERPDESK_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            api_url: get("ERPDESK_API_URL").unwrap_or(defaults.api_url),
            data_dir: get("ERPDESK_DATA_DIR")
                .map(PathBuf::from)
                .or(defaults.data_dir),
            demo_email: get("ERPDESK_DEMO_EMAIL").unwrap_or(defaults.demo_email),
            demo_password: get("ERPDESK_DEMO_PASSWORD").unwrap_or(defaults.demo_password),
        }
    }

    pub fn authenticator(&self) -> DemoAuthenticator {
        DemoAuthenticator::new(self.demo_email.clone(), self.demo_password.clone())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("erpdesk"))
}

#[cfg(target_arch = "wasm32")]
fn default_data_dir() -> Option<PathBuf> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn lookup_overrides_defaults() {
        let env = HashMap::from([
            ("ERPDESK_API_URL", "http://erp.internal:9000/"),
            ("ERPDESK_DATA_DIR", "/tmp/erpdesk-test"),
            ("ERPDESK_DEMO_EMAIL", "ops@corp.example"),
        ]);
        let config = ShellConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.api_url, "http://erp.internal:9000/");
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/erpdesk-test")));
        assert_eq!(config.demo_email, "ops@corp.example");
        assert_eq!(config.demo_password, DEMO_PASSWORD);
        assert_eq!(config.authenticator().email(), "ops@corp.example");
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = ShellConfig::from_lookup(|k| {
            (k == "ERPDESK_DEMO_EMAIL").then(|| "   ".to_string())
        });
        assert_eq!(config.demo_email, DEMO_EMAIL);
    }
}
