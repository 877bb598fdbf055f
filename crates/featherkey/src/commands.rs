//! Runs each authorization flow and reports the outcome.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use featherkey_oauth1::{
    AccessCredential, BrowserDisplay, LoopbackBroker, PlatformAdaptor, ReqwestTransport,
    StaticCredentials, SystemBrowser, TokenExchange,
};

use crate::config::Resolved;

/// Display for terminals without a browser: prints the URL to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintUrl;

impl BrowserDisplay for PrintUrl {
    fn display_in_browser(&self, url: &str) {
        eprintln!("Open this URL to authorize the application:\n\n  {url}\n");
    }
}

/// Display that opens the browser and also prints the URL as a fallback.
#[derive(Debug, Clone, Copy, Default)]
struct BrowserWithFallback;

impl BrowserDisplay for BrowserWithFallback {
    fn display_in_browser(&self, url: &str) {
        PrintUrl.display_in_browser(url);
        SystemBrowser.display_in_browser(url);
    }
}

fn exchange(config: &Resolved, platform: PlatformAdaptor) -> Result<TokenExchange> {
    Ok(TokenExchange::new(
        Arc::new(StaticCredentials::new(
            config.consumer_key.as_str(),
            config.consumer_secret.as_str(),
        )),
        platform,
        Arc::new(ReqwestTransport::with_config(&config.transport)?),
        config.endpoints.clone(),
    ))
}

/// PIN flow: show the authorization page, then read the PIN from stdin.
pub async fn pin(config: &Resolved, no_browser: bool) -> Result<AccessCredential> {
    let display: Arc<dyn BrowserDisplay> = if no_browser {
        Arc::new(PrintUrl)
    } else {
        Arc::new(BrowserWithFallback)
    };
    let exchange = exchange(config, PlatformAdaptor::headless(display))?;

    let Some(request_token) = exchange.start_authentication().await? else {
        bail!("{} did not issue a request token", config.endpoints.name);
    };

    let pin = prompt("PIN: ")?;
    let credential = exchange.confirm_pin(&pin, &request_token.token).await?;
    ensure_valid(credential)
}

/// Redirect flow through a loopback listener.
pub async fn broker(config: &Resolved, port: u16, path: &str, wait: u64) -> Result<AccessCredential> {
    let broker = LoopbackBroker::with_display(Arc::new(BrowserWithFallback))
        .with_wait(Duration::from_secs(wait));
    let exchange = exchange(config, PlatformAdaptor::broker(Arc::new(broker)))?;

    let callback_uri = LoopbackBroker::callback_uri(port, path);
    tracing::info!(%callback_uri, "Using loopback callback");
    let credential = exchange.authenticate_with_broker(&callback_uri).await?;
    ensure_valid(credential)
}

/// Direct username/password exchange.
pub async fn xauth(
    config: &Resolved,
    username: &str,
    password: Option<String>,
) -> Result<AccessCredential> {
    let password = match password {
        Some(password) => password,
        None => prompt("Password: ")?,
    };
    let exchange = exchange(config, PlatformAdaptor::headless(Arc::new(PrintUrl)))?;
    let credential = exchange.x_authenticate(username, &password).await?;
    ensure_valid(credential)
}

fn ensure_valid(credential: AccessCredential) -> Result<AccessCredential> {
    match credential.into_option() {
        Some(credential) => Ok(credential),
        None => bail!("authorization failed: no access token was issued"),
    }
}

/// Reads one trimmed line from stdin after printing `label` to stderr.
fn prompt(label: &str) -> Result<String> {
    eprint!("{label}");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
