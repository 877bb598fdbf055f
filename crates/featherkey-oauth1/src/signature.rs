//! HMAC-SHA1 request signing and `Authorization` header rendering.
//!
//! Signing follows RFC 5849 section 3.4 with one deliberate difference: the
//! parameter set is signed in the order given rather than sorted. Each flow
//! supplies its parameters in the order the provider expects.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::encoding::{encode, parameter_string};
use crate::platform::KeyedHasher;

/// Signature method advertised in every request.
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";

/// Protocol version advertised in every request.
pub const OAUTH_VERSION: &str = "1.0";

/// Builds the HMAC key: `encode(consumer_secret) & encode(token_secret)`.
///
/// A missing token secret leaves the part after `&` empty.
#[must_use]
pub fn signing_key(consumer_secret: &str, token_secret: Option<&str>) -> String {
    format!(
        "{}&{}",
        encode(consumer_secret),
        token_secret.map(encode).unwrap_or_default()
    )
}

/// Signs `base_string` and returns the base64 encoded digest.
///
/// The result is not yet percent-encoded; [`AuthorizationHeader`] does that
/// when rendering.
#[must_use]
pub fn sign(
    hasher: &dyn KeyedHasher,
    consumer_secret: &str,
    base_string: &str,
    token_secret: Option<&str>,
) -> String {
    let key = signing_key(consumer_secret, token_secret);
    let digest = hasher.hmac_sha1(key.as_bytes(), base_string.as_bytes());
    STANDARD.encode(digest)
}

/// Inputs to a single signing operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureInput {
    /// HTTP method, uppercase.
    pub http_method: String,
    /// Endpoint URL exactly as requested.
    pub endpoint_url: String,
    /// Parameters in signing order.
    pub parameters: Vec<(String, String)>,
}

impl SignatureInput {
    /// Creates a signature input for a `POST` to `endpoint_url`.
    #[must_use]
    pub fn post(endpoint_url: impl Into<String>) -> Self {
        Self {
            http_method: "POST".to_string(),
            endpoint_url: endpoint_url.into(),
            parameters: Vec::new(),
        }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push((key.into(), value.into()));
        self
    }

    /// Returns the canonical parameter string.
    #[must_use]
    pub fn parameter_string(&self) -> String {
        parameter_string(
            self.parameters
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        )
    }

    /// Returns `METHOD&encode(url)&encode(parameter_string)`.
    #[must_use]
    pub fn base_string(&self) -> String {
        format!(
            "{}&{}&{}",
            self.http_method,
            encode(&self.endpoint_url),
            encode(&self.parameter_string())
        )
    }
}

/// `OAuth` `Authorization` header value.
///
/// Values are percent-encoded on render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationHeader {
    realm: Option<String>,
    params: Vec<(String, String)>,
    compact: bool,
}

impl AuthorizationHeader {
    /// Header in the `OAuth realm="", key="value", ...` form.
    #[must_use]
    pub fn new() -> Self {
        Self {
            realm: Some(String::new()),
            params: Vec::new(),
            compact: false,
        }
    }

    /// Header without realm and with `,` separators (`OAuth a="1",b="2"`).
    #[must_use]
    pub const fn compact() -> Self {
        Self {
            realm: None,
            params: Vec::new(),
            compact: true,
        }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Returns the value of a parameter, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl Default for AuthorizationHeader {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AuthorizationHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = if self.compact { "," } else { ", " };
        let realm = self.realm.iter().map(|r| format!("realm=\"{r}\""));
        let params = self
            .params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)));
        let parts: Vec<String> = realm.chain(params).collect();
        write!(f, "OAuth {}", parts.join(separator))
    }
}
