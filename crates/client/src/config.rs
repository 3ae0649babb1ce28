//! Client configuration.

use std::time::Duration;

use url::Url;

/// Default backend base URL (local dev server).
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default page size for feed requests.
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Default per-request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Configuration for the client core.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub page_size: usize,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }

    /// Read configuration from `GAMERHUB_*` environment variables,
    /// falling back to defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let base_url = std::env::var("GAMERHUB_BASE_URL")
            .ok()
            .and_then(|s| Url::parse(&s).ok())
            .unwrap_or_else(default_base_url);
        let page_size = std::env::var("GAMERHUB_PAGE_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|n: &usize| *n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let request_timeout = std::env::var("GAMERHUB_REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS));

        Self {
            base_url,
            page_size,
            request_timeout,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(default_base_url())
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(
            config.request_timeout,
            Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS)
        );
    }

    #[test]
    fn new_keeps_the_given_base_url() {
        let url = Url::parse("https://forum.example.net").expect("valid url");
        let config = ClientConfig::new(url.clone());
        assert_eq!(config.base_url, url);
    }
}
