
use std::str::FromStr;

use thiserror::Error;

pub const API_URL_VAR: &str = "DASHBOARD_API_URL";
pub const CONVERT_URL_VAR: &str = "DASHBOARD_CONVERT_URL";
pub const HTTP_TIMEOUT_VAR: &str = "DASHBOARD_HTTP_TIMEOUT_SECS";
pub const UPLOAD_CONCURRENCY_VAR: &str = "DASHBOARD_UPLOAD_CONCURRENCY";

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;
const DEFAULT_UPLOAD_CONCURRENCY: usize = 4;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config error: {name} must be an http(s) URL, got '{value}'")]
    InvalidUrl {
        name: &'static str,
        value: String
    },
    #[error("Config error: {name} must be a positive integer, got '{value}'")]
    InvalidNumber {
        name: &'static str,
        value: String
    }
}

/// Endpoint locations and client limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Base URL of the dashboard-data endpoint, without a trailing slash.
    pub api_url: String,
    /// Full URL of the conversion endpoint.
    pub convert_url: String,
    pub http_timeout_secs: u64,
    /// Upper bound on concurrent submissions within one batch.
    pub upload_concurrency: usize
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            convert_url: format!("{DEFAULT_API_URL}/convert"),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            upload_concurrency: DEFAULT_UPLOAD_CONCURRENCY
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source; unset or blank variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| lookup(name).map(|value| value.trim().to_string()).filter(|value| !value.is_empty());

        let api_url = match read(API_URL_VAR) {
            Some(value) => parse_url(API_URL_VAR, &value)?,
            None => DEFAULT_API_URL.to_string()
        };

        let convert_url = match read(CONVERT_URL_VAR) {
            Some(value) => parse_url(CONVERT_URL_VAR, &value)?,
            None => format!("{api_url}/convert")
        };

        let http_timeout_secs = match read(HTTP_TIMEOUT_VAR) {
            Some(value) => parse_positive(HTTP_TIMEOUT_VAR, &value)?,
            None => DEFAULT_HTTP_TIMEOUT_SECS
        };

        let upload_concurrency = match read(UPLOAD_CONCURRENCY_VAR) {
            Some(value) => parse_positive(UPLOAD_CONCURRENCY_VAR, &value)?,
            None => DEFAULT_UPLOAD_CONCURRENCY
        };

        Ok(Self {
            api_url,
            convert_url,
            http_timeout_secs,
            upload_concurrency
        })
    }
}

fn parse_url(name: &'static str, value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim_end_matches('/');
    let has_host = trimmed.strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .is_some_and(|rest| !rest.is_empty());

    if !has_host {
        return Err(ConfigError::InvalidUrl { name, value: value.to_string() });
    }

    Ok(trimmed.to_string())
}

fn parse_positive<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
{
    match value.parse::<T>() {
        Ok(number) if number > T::default() => Ok(number),
        _ => Err(ConfigError::InvalidNumber { name, value: value.to_string() })
    }
}
