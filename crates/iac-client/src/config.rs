use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Where the design service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme, host and port. Routes are appended under `/api`.
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Full URL for an `/api/...` path. Tolerates a trailing slash on the
    /// base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn endpoint_joins_under_api() {
        let config = ClientConfig::with_base_url("http://127.0.0.1:9000/");
        assert_eq!(
            config.endpoint("/designs/d1"),
            "http://127.0.0.1:9000/api/designs/d1"
        );
        assert_eq!(ClientConfig::default().timeout, Duration::from_secs(30));
    }
}
