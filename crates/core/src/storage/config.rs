//! Drive client configuration.

use std::time::Duration;

/// Drive API client configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Base URL for metadata calls (`files` listing and folder creation).
    pub base_url: String,
    /// Root URL; media uploads go to `{root_url}upload/drive/v3/files`.
    pub root_url: String,
    /// Timeout applied to every Drive call.
    pub request_timeout: Duration,
}

impl StorageConfig {
    /// Default Drive v3 metadata endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://www.googleapis.com/drive/v3/";
    /// Default Google APIs root.
    pub const DEFAULT_ROOT_URL: &'static str = "https://www.googleapis.com/";
    /// Default request timeout: 60 seconds.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Create a config pointing at the public Drive API.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            root_url: Self::DEFAULT_ROOT_URL.to_string(),
            request_timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Set the metadata base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = with_trailing_slash(url.into());
        self
    }

    /// Set the root URL.
    #[must_use]
    pub fn with_root_url(mut self, url: impl Into<String>) -> Self {
        self.root_url = with_trailing_slash(url.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new()
    }
}

// The hub joins paths onto these URLs without a separator.
fn with_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url.push('/');
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorageConfig::new();
        assert_eq!(config.base_url, "https://www.googleapis.com/drive/v3/");
        assert_eq!(config.root_url, "https://www.googleapis.com/");
        assert_eq!(config.request_timeout, StorageConfig::DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_urls_end_with_single_slash() {
        let config = StorageConfig::new()
            .with_base_url("http://localhost:9000/drive/v3")
            .with_root_url("http://localhost:9000//");
        assert_eq!(config.base_url, "http://localhost:9000/drive/v3/");
        assert_eq!(config.root_url, "http://localhost:9000/");
    }
}
