//! Platform capabilities consumed by the token exchange.
//!
//! The exchange never talks to a browser or a hash implementation directly.
//! It receives a [`PlatformAdaptor`] holding a keyed-hash implementation and
//! one of two user interaction styles:
//!
//! - [`Interaction::Headless`] - show the authorization page and let the user
//!   copy a PIN back (CLI, terminals, devices without a redirect target)
//! - [`Interaction::Broker`] - drive a redirect-based authorization and hand
//!   back the callback payload

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha1::Sha1;

/// Keyed-hash capability used to sign requests.
pub trait KeyedHasher: Send + Sync {
    /// Computes HMAC-SHA1 of `message` under `key`, returning the raw digest.
    fn hmac_sha1(&self, key: &[u8], message: &[u8]) -> Vec<u8>;
}

/// Pure Rust HMAC-SHA1.
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacSha1;

impl KeyedHasher for HmacSha1 {
    fn hmac_sha1(&self, key: &[u8], message: &[u8]) -> Vec<u8> {
        // HMAC accepts keys of any length, so this never fails.
        let Ok(mut mac) = Hmac::<Sha1>::new_from_slice(key) else {
            return Vec::new();
        };
        mac.update(message);
        mac.finalize().into_bytes().to_vec()
    }
}

/// Shows an authorization page to the user (PIN flow).
pub trait BrowserDisplay: Send + Sync {
    /// Opens `url` for the user. Failures are reported out of band.
    fn display_in_browser(&self, url: &str);
}

/// Opens URLs in the system's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl BrowserDisplay for SystemBrowser {
    fn display_in_browser(&self, url: &str) {
        if let Err(e) = opener::open(url) {
            tracing::warn!(?e, "Failed to open browser, visit the URL manually");
        }
    }
}

/// Performs the user-facing redirect authorization (broker flow).
#[async_trait]
pub trait AuthBroker: Send + Sync {
    /// Sends the user to `url` and waits for the provider to redirect to
    /// `callback_uri`.
    ///
    /// Returns the callback payload (URL or query string containing
    /// `oauth_token` and `oauth_verifier`), or an empty string if the user
    /// cancelled or the broker gave up.
    async fn authorize(&self, url: &str, callback_uri: &str) -> String;
}

/// How the user is involved in authorizing the request token.
#[derive(Clone)]
pub enum Interaction {
    /// Display the authorization page; the user returns with a PIN.
    Headless(Arc<dyn BrowserDisplay>),
    /// Redirect-based authorization through a broker.
    Broker(Arc<dyn AuthBroker>),
}

impl fmt::Debug for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Headless(_) => f.write_str("Interaction::Headless"),
            Self::Broker(_) => f.write_str("Interaction::Broker"),
        }
    }
}

/// Platform capabilities: keyed hashing plus a user interaction style.
#[derive(Clone)]
pub struct PlatformAdaptor {
    hasher: Arc<dyn KeyedHasher>,
    interaction: Interaction,
}

impl PlatformAdaptor {
    /// Creates an adaptor from explicit capabilities.
    #[must_use]
    pub fn new(hasher: Arc<dyn KeyedHasher>, interaction: Interaction) -> Self {
        Self {
            hasher,
            interaction,
        }
    }

    /// Headless PIN adaptor using the given display and [`HmacSha1`].
    #[must_use]
    pub fn headless(display: Arc<dyn BrowserDisplay>) -> Self {
        Self::new(Arc::new(HmacSha1), Interaction::Headless(display))
    }

    /// Headless PIN adaptor that opens the system browser.
    #[must_use]
    pub fn system_browser() -> Self {
        Self::headless(Arc::new(SystemBrowser))
    }

    /// Broker adaptor using the given broker and [`HmacSha1`].
    #[must_use]
    pub fn broker(broker: Arc<dyn AuthBroker>) -> Self {
        Self::new(Arc::new(HmacSha1), Interaction::Broker(broker))
    }

    /// Returns the keyed-hash capability.
    #[must_use]
    pub fn hasher(&self) -> &dyn KeyedHasher {
        self.hasher.as_ref()
    }

    /// Returns the interaction style.
    #[must_use]
    pub const fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Returns the display capability if this is a headless adaptor.
    #[must_use]
    pub fn display(&self) -> Option<&dyn BrowserDisplay> {
        match &self.interaction {
            Interaction::Headless(display) => Some(display.as_ref()),
            Interaction::Broker(_) => None,
        }
    }

    /// Returns the broker capability if this is a broker adaptor.
    #[must_use]
    pub fn auth_broker(&self) -> Option<&dyn AuthBroker> {
        match &self.interaction {
            Interaction::Broker(broker) => Some(broker.as_ref()),
            Interaction::Headless(_) => None,
        }
    }
}

impl fmt::Debug for PlatformAdaptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformAdaptor")
            .field("interaction", &self.interaction)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    struct NoopDisplay;

    impl BrowserDisplay for NoopDisplay {
        fn display_in_browser(&self, _url: &str) {}
    }

    struct NoopBroker;

    #[async_trait]
    impl AuthBroker for NoopBroker {
        async fn authorize(&self, _url: &str, _callback_uri: &str) -> String {
            String::new()
        }
    }

    #[test]
    fn test_hmac_sha1_rfc2202_vector() {
        // RFC 2202 test case 2
        let digest = HmacSha1.hmac_sha1(b"Jefe", b"what do ya want for nothing?");
        let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        assert_eq!(hex, "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79");
    }

    #[test]
    fn test_hmac_sha1_empty_key() {
        let digest = HmacSha1.hmac_sha1(b"", b"");
        assert_eq!(STANDARD.encode(digest), "+9sdGxiqbAgyS31ktx+3Y3BpDh0=");
    }

    #[test]
    fn test_headless_adaptor() {
        let adaptor = PlatformAdaptor::headless(Arc::new(NoopDisplay));
        assert!(adaptor.display().is_some());
        assert!(adaptor.auth_broker().is_none());
        assert!(matches!(adaptor.interaction(), Interaction::Headless(_)));
    }

    #[test]
    fn test_broker_adaptor() {
        let adaptor = PlatformAdaptor::broker(Arc::new(NoopBroker));
        assert!(adaptor.display().is_none());
        assert!(adaptor.auth_broker().is_some());
        assert_eq!(
            format!("{adaptor:?}"),
            "PlatformAdaptor { interaction: Interaction::Broker, .. }"
        );
    }
}
