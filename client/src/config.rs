//! Client configuration.

use std::time::Duration;

/// Environment variable naming the API base URL.
///
/// The name is inherited from the deployment environment this client drops
/// into; existing installs already set it.
pub const BASE_URL_ENV: &str = "REACT_APP_API_URL";

/// Base URL used when the environment does not provide one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Deadline applied to every request issued through the client.
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Configuration for the shared [`Api`](crate::Api) client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    /// Resolve configuration from the environment.
    pub fn from_env() -> Self {
        Self {
            base_url: resolve_base_url(std::env::var(BASE_URL_ENV).ok().as_deref()),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Configuration pointing at an explicit base URL, with the default
    /// timeout.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

/// The provided base URL, unless unset or empty.
fn resolve_base_url(value: Option<&str>) -> String {
    match value {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => DEFAULT_BASE_URL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_base_url_falls_back_to_default() {
        assert_eq!(resolve_base_url(None), DEFAULT_BASE_URL);
    }

    #[test]
    fn empty_base_url_falls_back_to_default() {
        assert_eq!(resolve_base_url(Some("")), DEFAULT_BASE_URL);
    }

    #[test]
    fn provided_base_url_wins() {
        assert_eq!(
            resolve_base_url(Some("https://todos.example.com")),
            "https://todos.example.com"
        );
    }

    #[test]
    fn from_env_reads_the_environment() {
        // Set and unset within one test so parallel unit tests never race
        // on the process environment.
        std::env::set_var(BASE_URL_ENV, "http://api.internal:8080");
        assert_eq!(ApiConfig::from_env().base_url, "http://api.internal:8080");

        std::env::remove_var(BASE_URL_ENV);
        let config = ApiConfig::from_env();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, REQUEST_TIMEOUT);
    }
}
