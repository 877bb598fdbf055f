//! # featherkey-oauth1
//!
//! `OAuth 1.0a` client-side token exchange: obtain a long-lived access token
//! and secret for a user account without the user handing their password to
//! the application.
//!
//! ## Features
//!
//! - **PIN flow**: request token, browser authorization, PIN confirmation
//! - **Browser-broker flow**: redirect-based authorization with a callback
//! - **xAuth**: direct username/password exchange for approved applications
//! - **HMAC-SHA1 signing** with `OAuth`-strict percent-encoding
//! - **Pluggable capabilities**: clock/nonce source, keyed hash, browser or
//!   broker interaction and HTTP transport are all injected
//!
//! ## Quick Start
//!
//! ### PIN Flow (CLI/Headless Apps)
//!
//! ```ignore
//! use featherkey_oauth1::{PlatformAdaptor, TokenExchange};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let exchange = TokenExchange::twitter(
//!         "consumer_key",
//!         "consumer_secret",
//!         PlatformAdaptor::system_browser(),
//!     )?;
//!
//!     // Opens the authorization page in the browser
//!     let Some(request_token) = exchange.start_authentication().await? else {
//!         return Err("provider refused the request token".into());
//!     };
//!
//!     let pin = "1234567"; // read from the user
//!     let credential = exchange.confirm_pin(pin, &request_token.token).await?;
//!     if credential.is_valid() {
//!         println!("Authorized as @{}", credential.screen_name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Browser-Broker Flow
//!
//! ```ignore
//! use std::sync::Arc;
//! use featherkey_oauth1::{LoopbackBroker, PlatformAdaptor, TokenExchange};
//!
//! let platform = PlatformAdaptor::broker(Arc::new(LoopbackBroker::new()));
//! let exchange = TokenExchange::twitter("consumer_key", "consumer_secret", platform)?;
//! let credential = exchange
//!     .authenticate_with_broker(&LoopbackBroker::callback_uri(8765, "/callback"))
//!     .await?;
//! ```
//!
//! ### xAuth
//!
//! ```ignore
//! let credential = exchange.x_authenticate("username", "password").await?;
//! ```
//!
//! ## Failure Handling
//!
//! Missing arguments or capabilities are reported as [`Error`] before any
//! request is sent. Everything that goes wrong on the wire (timeouts, HTTP
//! errors, rejected or incomplete responses) is a normal return value:
//! `None` for a request token, [`AccessCredential::null`] for a credential.
//! Check [`AccessCredential::is_valid`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod credentials;
pub mod encoding;
mod error;
pub mod flow;
pub mod loopback;
pub mod platform;
pub mod provider;
pub mod response;
pub mod signature;
pub mod transport;

pub use credentials::{
    AccessCredential, ClientIdentity, CredentialStore, RequestToken, StaticCredentials,
};
pub use error::{Error, Result};
pub use flow::TokenExchange;
pub use loopback::LoopbackBroker;
pub use platform::{
    AuthBroker, BrowserDisplay, HmacSha1, Interaction, KeyedHasher, PlatformAdaptor,
    SystemBrowser,
};
pub use provider::Endpoints;
pub use transport::{HttpTransport, ReqwestTransport, TransportConfig};
