//! PIN-based (out-of-band) authorization.

use super::{TokenExchange, require, signed_parameters, standard_header};
use crate::credentials::{AccessCredential, RequestToken};
use crate::error::{Error, Result};

impl TokenExchange {
    /// Obtains a request token and shows the authorization page.
    ///
    /// The user authorizes the application in the browser and is shown a
    /// PIN, which is passed to [`confirm_pin`](Self::confirm_pin) together
    /// with the returned token.
    ///
    /// Returns `Ok(None)` if the provider did not hand out a request token;
    /// nothing is displayed in that case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the client id or secret is blank
    /// or the platform has no browser display capability.
    pub async fn start_authentication(&self) -> Result<Option<RequestToken>> {
        let identity = self.require_identity()?;
        let display = self
            .platform
            .display()
            .ok_or_else(|| Error::invalid_argument("PIN flow needs a browser display adaptor"))?;

        let Some(token) = self.fetch_request_token(identity).await else {
            return Ok(None);
        };

        let url = self.endpoints.authorization_url(&token.token);
        tracing::debug!(provider = %self.endpoints.name, "Displaying authorization page");
        display.display_in_browser(&url);

        Ok(Some(token))
    }

    /// Exchanges a PIN and request token for an access credential.
    ///
    /// The request is signed with the consumer secret alone and the request
    /// token is sent in the header but left out of the signed parameters.
    /// Twitter accepts this form for PIN verification.
    ///
    /// Returns [`AccessCredential::null`] if the exchange failed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the PIN is blank or the client
    /// id or secret is blank.
    pub async fn confirm_pin(&self, pin: &str, request_token: &str) -> Result<AccessCredential> {
        require(pin, "PIN authorization code must be specified")?;
        let identity = self.require_identity()?;

        let url = self.endpoints.access_token_url.as_str();
        let stamp = self.stamp();
        let input = signed_parameters(url, identity, &stamp, None);
        let header = standard_header(identity, &stamp)
            .param("oauth_verifier", pin.trim())
            .param("oauth_token", request_token)
            .param("oauth_signature", self.signature(identity, &input));

        tracing::debug!(provider = %self.endpoints.name, "Confirming PIN");
        let body = self.transport.post_form(url, &header.to_string(), None).await;
        Ok(self.access_credential(identity, &body))
    }
}
