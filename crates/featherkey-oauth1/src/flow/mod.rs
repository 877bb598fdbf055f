//! `OAuth 1.0a` token exchange flows.
//!
//! Three flows are supported, all producing an [`AccessCredential`]:
//!
//! - **PIN** ([`TokenExchange::start_authentication`] then
//!   [`TokenExchange::confirm_pin`]) for terminals and headless clients
//! - **Browser broker** ([`TokenExchange::authenticate_with_broker`]) for
//!   redirect-based authorization
//! - **xAuth** ([`TokenExchange::x_authenticate`]) exchanging a username and
//!   password directly
//!
//! Each step is one signed POST. Steps run strictly in sequence since every
//! access token request depends on the request token from the step before.
//! A [`TokenExchange`] holds no mutable state, so independent attempts can
//! share one instance across tasks.

mod broker;
mod pin;
mod xauth;

use std::fmt;
use std::sync::Arc;

use crate::credentials::{AccessCredential, ClientIdentity, CredentialStore, RequestToken, StaticCredentials};
use crate::error::{Error, Result};
use crate::platform::PlatformAdaptor;
use crate::provider::Endpoints;
use crate::response::ResponseFields;
use crate::signature::{AuthorizationHeader, OAUTH_VERSION, SIGNATURE_METHOD, SignatureInput, sign};
use crate::transport::{HttpTransport, ReqwestTransport};

/// Nonce and timestamp for one signed request.
#[derive(Debug, Clone)]
struct Stamp {
    nonce: String,
    timestamp: String,
}

/// Orchestrates the `OAuth 1.0a` flows against a provider.
#[derive(Clone)]
pub struct TokenExchange {
    credentials: Arc<dyn CredentialStore>,
    platform: PlatformAdaptor,
    transport: Arc<dyn HttpTransport>,
    endpoints: Endpoints,
}

impl TokenExchange {
    /// Creates a token exchange from explicit capabilities.
    #[must_use]
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        platform: PlatformAdaptor,
        transport: Arc<dyn HttpTransport>,
        endpoints: Endpoints,
    ) -> Self {
        Self {
            credentials,
            platform,
            transport,
            endpoints,
        }
    }

    /// Creates a token exchange against Twitter using the default
    /// credential store and transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn twitter(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        platform: PlatformAdaptor,
    ) -> Result<Self> {
        Ok(Self::new(
            Arc::new(StaticCredentials::new(client_id, client_secret)),
            platform,
            Arc::new(ReqwestTransport::new()?),
            Endpoints::twitter()?,
        ))
    }

    /// Returns the configured endpoints.
    #[must_use]
    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Returns the platform adaptor.
    #[must_use]
    pub const fn platform(&self) -> &PlatformAdaptor {
        &self.platform
    }

    /// Returns the client identity after checking both halves are set.
    fn require_identity(&self) -> Result<&ClientIdentity> {
        let identity = self.credentials.identity();
        require(&identity.client_id, "ClientID must be specified")?;
        require(&identity.client_secret, "ClientSecret must be specified")?;
        Ok(identity)
    }

    fn stamp(&self) -> Stamp {
        Stamp {
            nonce: self.credentials.generate_nonce(),
            timestamp: self.credentials.generate_timestamp().to_string(),
        }
    }

    /// Signs with the consumer secret only.
    fn signature(&self, identity: &ClientIdentity, input: &SignatureInput) -> String {
        sign(
            self.platform.hasher(),
            &identity.client_secret,
            &input.base_string(),
            None,
        )
    }

    /// Requests a request token. `None` covers every failure.
    async fn fetch_request_token(&self, identity: &ClientIdentity) -> Option<RequestToken> {
        let url = self.endpoints.request_token_url.as_str();
        let stamp = self.stamp();
        let input = signed_parameters(url, identity, &stamp, None);
        let header = standard_header(identity, &stamp)
            .param("oauth_signature", self.signature(identity, &input));

        tracing::debug!(provider = %self.endpoints.name, "Requesting request token");
        let body = self.transport.post_form(url, &header.to_string(), None).await;
        if body.trim().is_empty() {
            tracing::warn!(provider = %self.endpoints.name, "No response from request token endpoint");
            return None;
        }

        let token = ResponseFields::parse(&body).request_token();
        if token.is_none() {
            tracing::warn!(provider = %self.endpoints.name, "Request token response had no oauth_token");
        }
        token
    }

    /// Parses an access token response body.
    fn access_credential(&self, identity: &ClientIdentity, body: &str) -> AccessCredential {
        if body.trim().is_empty() {
            tracing::warn!(provider = %self.endpoints.name, "No response from access token endpoint");
            return AccessCredential::null();
        }
        let credential = ResponseFields::parse(body).access_credential(identity);
        if credential.is_valid() {
            tracing::info!(
                provider = %self.endpoints.name,
                screen_name = %credential.screen_name,
                user_id = credential.user_id,
                "Access token obtained"
            );
        } else {
            tracing::warn!(provider = %self.endpoints.name, "Access token response incomplete");
        }
        credential
    }
}

impl fmt::Debug for TokenExchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenExchange")
            .field("identity", self.credentials.identity())
            .field("platform", &self.platform)
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

/// Rejects blank values before any network activity.
fn require(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_argument(message));
    }
    Ok(())
}

/// Signature parameter set, in the order the provider signs it.
fn signed_parameters(
    url: &str,
    identity: &ClientIdentity,
    stamp: &Stamp,
    token: Option<&str>,
) -> SignatureInput {
    let input = SignatureInput::post(url)
        .param("oauth_consumer_key", identity.client_id.as_str())
        .param("oauth_nonce", stamp.nonce.as_str())
        .param("oauth_signature_method", SIGNATURE_METHOD)
        .param("oauth_timestamp", stamp.timestamp.as_str());
    let input = match token {
        Some(token) => input.param("oauth_token", token),
        None => input,
    };
    input.param("oauth_version", OAUTH_VERSION)
}

/// `Authorization` header fields shared by the request and access token steps.
fn standard_header(identity: &ClientIdentity, stamp: &Stamp) -> AuthorizationHeader {
    AuthorizationHeader::new()
        .param("oauth_nonce", stamp.nonce.as_str())
        .param("oauth_timestamp", stamp.timestamp.as_str())
        .param("oauth_consumer_key", identity.client_id.as_str())
        .param("oauth_signature_method", SIGNATURE_METHOD)
        .param("oauth_version", OAUTH_VERSION)
}
