//! `OAuth 1.0a` provider endpoint configurations.

use crate::error::{Error, Result};
use url::Url;

/// `OAuth 1.0a` provider endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Provider name (e.g., "Twitter").
    pub name: String,
    /// Request token endpoint URL.
    pub request_token_url: Url,
    /// User authorization page; the request token is appended as
    /// `?oauth_token=<token>`.
    pub authorize_url: Url,
    /// Access token endpoint URL.
    pub access_token_url: Url,
    /// xAuth access token endpoint (if supported).
    pub xauth_access_token_url: Option<Url>,
}

impl Endpoints {
    /// Creates a new endpoint configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if URLs are invalid.
    pub fn new(
        name: impl Into<String>,
        request_token_url: impl AsRef<str>,
        authorize_url: impl AsRef<str>,
        access_token_url: impl AsRef<str>,
    ) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            request_token_url: Url::parse(request_token_url.as_ref())?,
            authorize_url: Url::parse(authorize_url.as_ref())?,
            access_token_url: Url::parse(access_token_url.as_ref())?,
            xauth_access_token_url: None,
        })
    }

    /// Sets the xAuth access token URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn with_xauth_access_token_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.xauth_access_token_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Twitter endpoint configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if URL parsing fails.
    pub fn twitter() -> Result<Self> {
        Self::new(
            "Twitter",
            "https://api.twitter.com/oauth/request_token",
            "https://api.twitter.com/oauth/authorize",
            "https://api.twitter.com/oauth/access_token",
        )?
        .with_xauth_access_token_url(
            "https://api.twitter.com/oauth/access_token?send_error_codes=true",
        )
    }

    /// Builds the user authorization URL for a request token.
    #[must_use]
    pub fn authorization_url(&self, request_token: &str) -> String {
        format!("{}?oauth_token={request_token}", self.authorize_url)
    }

    /// Returns the xAuth endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider has no xAuth endpoint.
    pub fn xauth_url(&self) -> Result<&Url> {
        self.xauth_access_token_url.as_ref().ok_or_else(|| {
            Error::InvalidConfig(format!("Provider {} does not support xAuth", self.name))
        })
    }

    /// Validates that the endpoints are usable.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        for (label, url) in [
            ("request_token_url", &self.request_token_url),
            ("authorize_url", &self.authorize_url),
            ("access_token_url", &self.access_token_url),
        ] {
            if !matches!(url.scheme(), "http" | "https") {
                return Err(Error::InvalidConfig(format!(
                    "{label} must be http or https, got {}",
                    url.scheme()
                )));
            }
        }
        if self.authorize_url.query().is_some() {
            return Err(Error::InvalidConfig(
                "authorize_url must not carry a query string".into(),
            ));
        }
        Ok(())
    }
}
