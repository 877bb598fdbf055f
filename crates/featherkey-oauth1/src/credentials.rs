//! Client identity, request tokens and the final access credential.

use chrono::Utc;
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};

/// Length of generated nonces.
const NONCE_LENGTH: usize = 32;

/// Application-level consumer key and secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    /// Consumer key issued by the provider.
    pub client_id: String,
    /// Consumer secret issued by the provider.
    pub client_secret: String,
}

impl ClientIdentity {
    /// Creates a client identity.
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl std::fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Source of the client identity and per-request replay protection values.
pub trait CredentialStore: Send + Sync {
    /// Returns the client identity.
    fn identity(&self) -> &ClientIdentity;

    /// Returns the current time in seconds since the Unix epoch.
    fn generate_timestamp(&self) -> i64;

    /// Returns a fresh nonce. Must differ between calls.
    fn generate_nonce(&self) -> String;
}

/// Fixed client identity with a system clock and random nonces.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    identity: ClientIdentity,
}

impl StaticCredentials {
    /// Creates a credential store for the given consumer key and secret.
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            identity: ClientIdentity::new(client_id, client_secret),
        }
    }
}

impl From<ClientIdentity> for StaticCredentials {
    fn from(identity: ClientIdentity) -> Self {
        Self { identity }
    }
}

impl CredentialStore for StaticCredentials {
    fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    fn generate_timestamp(&self) -> i64 {
        Utc::now().timestamp()
    }

    fn generate_nonce(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LENGTH)
            .map(char::from)
            .collect()
    }
}

/// Short-lived token used only to obtain user authorization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestToken {
    /// `oauth_token`.
    pub token: String,
    /// `oauth_token_secret`.
    pub token_secret: String,
    /// Whether the server confirmed the callback (`oauth_callback_confirmed`).
    pub callback_confirmed: bool,
}

/// Long-lived access credential for a user account.
///
/// Either fully populated with `valid == true`, or equal to
/// [`AccessCredential::null`]. Callers persist it themselves.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessCredential {
    /// Consumer key the token was issued to.
    pub consumer_key: String,
    /// Consumer secret the token was issued to.
    pub consumer_secret: String,
    /// Access token.
    pub token: String,
    /// Access token secret.
    pub token_secret: String,
    /// Account screen name.
    pub screen_name: String,
    /// Account numeric identifier.
    pub user_id: i64,
    /// False only for the null sentinel.
    pub valid: bool,
}

impl AccessCredential {
    /// The failure sentinel: empty fields and `valid == false`.
    #[must_use]
    pub fn null() -> Self {
        Self::default()
    }

    /// Returns true unless this is the null sentinel.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Converts to `Some(self)` when valid, `None` for the sentinel.
    #[must_use]
    pub fn into_option(self) -> Option<Self> {
        self.valid.then_some(self)
    }
}
