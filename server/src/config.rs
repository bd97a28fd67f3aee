//! Host configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use portal::types::{BankDetails, DEFAULT_TOKEN_STORAGE_KEY, PortalSettings};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PROXY_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is required")]
    Missing { var: &'static str },
    #[error("{var} has an invalid value: {value}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    pub port: u16,
    /// Upstream REST API root, without a trailing `/`.
    pub api_base_url: String,
    pub token_storage_key: String,
    pub bank: BankDetails,
    pub proxy_timeout_secs: u64,
}

impl PortalConfig {
    /// Build typed host config from environment variables.
    ///
    /// Required:
    /// - `PORTAL_API_BASE_URL`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `PORTAL_TOKEN_STORAGE_KEY`: default `portal_token`
    /// - `PORTAL_BANK_NAME`, `PORTAL_BANK_ACCOUNT_HOLDER`,
    ///   `PORTAL_BANK_ACCOUNT_REFERENCE`: shown on the payment forms
    /// - `PORTAL_PROXY_TIMEOUT_SECS`: default 30
    ///
    /// # Errors
    ///
    /// Fails when the API base URL is missing or a number does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = std::env::var("PORTAL_API_BASE_URL")
            .ok()
            .map(|v| v.trim().trim_end_matches('/').to_owned())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing { var: "PORTAL_API_BASE_URL" })?;
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid { var: "PORTAL_API_BASE_URL", value: api_base_url });
        }

        Ok(Self {
            port: env_parse("PORT", DEFAULT_PORT)?,
            api_base_url,
            token_storage_key: env_or("PORTAL_TOKEN_STORAGE_KEY", DEFAULT_TOKEN_STORAGE_KEY),
            bank: BankDetails {
                bank_name: env_or("PORTAL_BANK_NAME", ""),
                account_holder: env_or("PORTAL_BANK_ACCOUNT_HOLDER", ""),
                account_reference: env_or("PORTAL_BANK_ACCOUNT_REFERENCE", ""),
            },
            proxy_timeout_secs: env_parse("PORTAL_PROXY_TIMEOUT_SECS", DEFAULT_PROXY_TIMEOUT_SECS)?,
        })
    }

    /// The public subset handed to the browser.
    #[must_use]
    pub fn settings(&self) -> PortalSettings {
        PortalSettings { token_storage_key: self.token_storage_key.clone(), bank: self.bank.clone() }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty()).unwrap_or_else(|| default.to_owned())
}

fn env_parse<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map_err(|_| ConfigError::Invalid { var: key, value: raw })
        }
        _ => Ok(default),
    }
}
