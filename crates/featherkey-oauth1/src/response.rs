//! Parsing of `key=value&key=value` token endpoint responses.
//!
//! Values are taken verbatim, without percent-decoding. A pair without `=`
//! is skipped, unknown keys are kept but never read, and a repeated key
//! keeps its last value.

use std::collections::HashMap;

use crate::credentials::{AccessCredential, ClientIdentity, RequestToken};

/// Key/value pairs from a response body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseFields<'a> {
    fields: HashMap<&'a str, &'a str>,
}

impl<'a> ResponseFields<'a> {
    /// Parses a response body.
    #[must_use]
    pub fn parse(body: &'a str) -> Self {
        let fields = body
            .trim()
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .collect();
        Self { fields }
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.fields.get(key).copied()
    }

    /// Returns the value for `key` if present and non-empty.
    #[must_use]
    pub fn non_empty(&self, key: &str) -> Option<&'a str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Returns true if no pairs were parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Extracts a request token.
    ///
    /// Returns `None` unless `oauth_token` is present and non-empty.
    #[must_use]
    pub fn request_token(&self) -> Option<RequestToken> {
        let token = self.non_empty("oauth_token")?;
        Some(RequestToken {
            token: token.to_string(),
            token_secret: self.get("oauth_token_secret").unwrap_or_default().to_string(),
            callback_confirmed: self
                .get("oauth_callback_confirmed")
                .is_some_and(|v| v.eq_ignore_ascii_case("true")),
        })
    }

    /// Builds an access credential for `identity`.
    ///
    /// Requires `oauth_token`, `oauth_token_secret`, `user_id` and
    /// `screen_name`, with `user_id` parsing as an integer. Anything less
    /// yields the null sentinel.
    #[must_use]
    pub fn access_credential(&self, identity: &ClientIdentity) -> AccessCredential {
        let (Some(token), Some(token_secret), Some(user_id), Some(screen_name)) = (
            self.non_empty("oauth_token"),
            self.non_empty("oauth_token_secret"),
            self.non_empty("user_id"),
            self.non_empty("screen_name"),
        ) else {
            tracing::debug!("Access token response missing required fields");
            return AccessCredential::null();
        };

        let Ok(user_id) = user_id.parse::<i64>() else {
            tracing::warn!(user_id, "Access token response has non-numeric user_id");
            return AccessCredential::null();
        };

        AccessCredential {
            consumer_key: identity.client_id.clone(),
            consumer_secret: identity.client_secret.clone(),
            token: token.to_string(),
            token_secret: token_secret.to_string(),
            screen_name: screen_name.to_string(),
            user_id,
            valid: true,
        }
    }
}

/// Verifier data returned through the authorization callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    /// Request token echoed back by the provider.
    pub token: String,
    /// `oauth_verifier`.
    pub verifier: String,
}

impl CallbackParams {
    /// Extracts `oauth_token` and `oauth_verifier` from a callback payload.
    ///
    /// The payload may be a full URL, a path with a query, or a bare query
    /// string; parsing starts at the first occurrence of `oauth_token`.
    #[must_use]
    pub fn from_payload(payload: &str) -> Option<Self> {
        let start = payload.find("oauth_token")?;
        let query = &payload[start..];
        let query = query.split(['#', ' ', '\r', '\n']).next().unwrap_or_default();
        let fields = ResponseFields::parse(query);
        Some(Self {
            token: fields.non_empty("oauth_token")?.to_string(),
            verifier: fields.non_empty("oauth_verifier")?.to_string(),
        })
    }
}
