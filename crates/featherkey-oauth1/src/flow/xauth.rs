//! xAuth: direct username/password exchange.

use super::{Stamp, TokenExchange, require, signed_parameters};
use crate::credentials::{AccessCredential, ClientIdentity};
use crate::encoding::encode;
use crate::error::Result;
use crate::signature::{AuthorizationHeader, OAUTH_VERSION, SIGNATURE_METHOD};

impl TokenExchange {
    /// Exchanges a username and password directly for an access credential.
    ///
    /// Only available to applications the provider has approved for xAuth.
    /// There is no request token or browser step.
    ///
    /// Returns [`AccessCredential::null`] if the exchange failed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if
    /// the client id, secret, username or password is blank, and
    /// [`Error::InvalidConfig`](crate::Error::InvalidConfig) if the provider
    /// has no xAuth endpoint.
    pub async fn x_authenticate(&self, username: &str, password: &str) -> Result<AccessCredential> {
        let identity = self.require_identity()?;
        require(username, "xAuth username must be specified")?;
        require(password, "xAuth password must be specified")?;
        let url = self.endpoints.xauth_url()?.as_str();

        let stamp = self.stamp();
        let input = signed_parameters(url, identity, &stamp, None);
        let header = xauth_header(identity, &stamp, &self.signature(identity, &input));
        let body = format!(
            "x_auth_username={}&x_auth_password={}&x_auth_mode=client_auth",
            encode(username),
            encode(password)
        );

        tracing::debug!(provider = %self.endpoints.name, "Requesting xAuth access token");
        let response = self
            .transport
            .post_form(url, &header.to_string(), Some(&body))
            .await;
        Ok(self.access_credential(identity, &response))
    }
}

/// Compact header with parameters in alphabetical order.
fn xauth_header(identity: &ClientIdentity, stamp: &Stamp, signature: &str) -> AuthorizationHeader {
    AuthorizationHeader::compact()
        .param("oauth_consumer_key", identity.client_id.as_str())
        .param("oauth_nonce", stamp.nonce.as_str())
        .param("oauth_signature", signature)
        .param("oauth_signature_method", SIGNATURE_METHOD)
        .param("oauth_timestamp", stamp.timestamp.as_str())
        .param("oauth_version", OAUTH_VERSION)
}
