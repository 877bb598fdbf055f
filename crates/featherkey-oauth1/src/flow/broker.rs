//! Browser-broker (redirect callback) authorization.

use super::{TokenExchange, require, signed_parameters, standard_header};
use crate::credentials::AccessCredential;
use crate::error::{Error, Result};
use crate::response::CallbackParams;

impl TokenExchange {
    /// Runs the full redirect flow through the platform's broker.
    ///
    /// 1. Obtains a request token; the provider must confirm the callback.
    /// 2. Hands the authorization URL and `callback_uri` to the broker.
    /// 3. Reads `oauth_token` and `oauth_verifier` from the callback payload.
    /// 4. Exchanges them for an access credential. Unlike the PIN flow, the
    ///    request token is part of the signed parameters and the verifier
    ///    travels in the request body.
    ///
    /// Returns [`AccessCredential::null`] if any step fails or the user
    /// cancels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the client id, secret or callback
    /// URI is blank, or the platform has no broker capability.
    pub async fn authenticate_with_broker(&self, callback_uri: &str) -> Result<AccessCredential> {
        let identity = self.require_identity()?;
        require(callback_uri, "Callback URI must be specified")?;
        let broker = self
            .platform
            .auth_broker()
            .ok_or_else(|| Error::invalid_argument("Broker flow needs a broker adaptor"))?;

        let Some(request_token) = self.fetch_request_token(identity).await else {
            return Ok(AccessCredential::null());
        };
        if !request_token.callback_confirmed {
            tracing::warn!(provider = %self.endpoints.name, "Provider did not confirm the callback");
            return Ok(AccessCredential::null());
        }

        let url = self.endpoints.authorization_url(&request_token.token);
        tracing::debug!(provider = %self.endpoints.name, callback_uri, "Starting broker authorization");
        let payload = broker.authorize(&url, callback_uri).await;
        if payload.trim().is_empty() {
            tracing::info!(provider = %self.endpoints.name, "Authorization cancelled");
            return Ok(AccessCredential::null());
        }

        let Some(callback) = CallbackParams::from_payload(&payload) else {
            tracing::warn!(provider = %self.endpoints.name, "Callback carried no verifier");
            return Ok(AccessCredential::null());
        };

        let url = self.endpoints.access_token_url.as_str();
        let stamp = self.stamp();
        let input = signed_parameters(url, identity, &stamp, Some(&callback.token));
        let header = standard_header(identity, &stamp)
            .param("oauth_token", callback.token.as_str())
            .param("oauth_signature", self.signature(identity, &input));
        let body = format!("oauth_verifier={}", callback.verifier);

        tracing::debug!(provider = %self.endpoints.name, "Exchanging verifier for access token");
        let response = self
            .transport
            .post_form(url, &header.to_string(), Some(&body))
            .await;
        Ok(self.access_credential(identity, &response))
    }
}
