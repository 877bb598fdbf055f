//! HTTP transport for token endpoint requests.
//!
//! The exchange only needs one operation: POST a signed request and get the
//! body back. Every failure (connect error, timeout, non-2xx status,
//! unreadable body) comes back as an empty string, so the exchange treats them
//! all the same way.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT_ENCODING, AUTHORIZATION, CONTENT_TYPE};

use crate::error::Result;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("featherkey/", env!("CARGO_PKG_VERSION"));

/// Sends signed form POSTs to token endpoints.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POSTs to `url` with the given `Authorization` header value and an
    /// optional `application/x-www-form-urlencoded` body.
    ///
    /// Returns the response body, or an empty string on any failure.
    async fn post_form(&self, url: &str, authorization: &str, body: Option<&str>) -> String;
}

/// Transport configuration.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Whole-request timeout, including reading the body.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl TransportConfig {
    /// Creates a configuration with a 30 second timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> TransportConfigBuilder {
        TransportConfigBuilder::new()
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for transport configuration.
#[derive(Debug, Clone, Default)]
pub struct TransportConfigBuilder {
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl TransportConfigBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        }
    }
}

/// [`HttpTransport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new() -> Result<Self> {
        Self::with_config(&TransportConfig::default())
    }

    /// Creates a transport from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_config(config: &TransportConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }

    /// Wraps an existing client. Its timeout settings are used as-is.
    #[must_use]
    pub const fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_form(&self, url: &str, authorization: &str, body: Option<&str>) -> String {
        let mut request = self
            .client
            .post(url)
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT_ENCODING, "identity");

        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body.to_string());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url, timeout = e.is_timeout(), "Token request failed: {e}");
                return String::new();
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, %status, "Token endpoint rejected request");
            return String::new();
        }

        match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(url, timeout = e.is_timeout(), "Failed to read token response: {e}");
                String::new()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TransportConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("featherkey/"));
    }

    #[test]
    fn test_config_builder() {
        let config = TransportConfig::builder()
            .timeout(Duration::from_secs(5))
            .user_agent("test-agent/1.0")
            .build();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }

    #[test]
    fn test_builder_defaults() {
        let config = TransportConfigBuilder::new().build();
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_empty() {
        let transport = ReqwestTransport::with_config(
            &TransportConfig::builder()
                .timeout(Duration::from_secs(2))
                .build(),
        )
        .unwrap();
        let body = transport
            .post_form("http://127.0.0.1:9/oauth/request_token", "OAuth", None)
            .await;
        assert!(body.is_empty());
    }
}
