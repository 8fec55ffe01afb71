use std::time::Duration;

/// Configuration for the console client.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Base URL of the web application (e.g. `https://rooms.example.org`).
    pub base_url: String,
    /// Path prefix of the REST API, prepended to every resource path.
    pub api_prefix: String,
    /// Bearer token for the session, if any.
    pub token: Option<String>,
    /// Sent as `Accept-Language` so server messages come back localised.
    pub locale: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ConsoleConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_prefix: "/api/v1".into(),
            token: None,
            locale: None,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_api_prefix(mut self, prefix: &str) -> Self {
        self.api_prefix = prefix.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
