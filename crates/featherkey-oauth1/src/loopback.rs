//! Loopback redirect broker.
//!
//! Opens the authorization page in the browser and waits for the provider to
//! redirect to a `http://127.0.0.1:<port>/<path>` (or `[::1]`) callback. The
//! first request to the callback path is answered with a short page and its
//! request target (`/path?oauth_token=...&oauth_verifier=...`) becomes the
//! callback payload.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use url::{Host, Url};

use crate::platform::{AuthBroker, BrowserDisplay, SystemBrowser};

/// How long to wait for the user by default.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(300);

/// How long a single connection may take to deliver its request.
const CONNECTION_DEADLINE: Duration = Duration::from_secs(10);

const SUCCESS_PAGE: &str = "<html><body><p>Authorization complete. You can close this window.</p></body></html>";

/// [`AuthBroker`] that captures the redirect on a local port.
#[derive(Clone)]
pub struct LoopbackBroker {
    display: Arc<dyn BrowserDisplay>,
    wait: Duration,
}

impl LoopbackBroker {
    /// Creates a broker that opens the system browser.
    #[must_use]
    pub fn new() -> Self {
        Self::with_display(Arc::new(SystemBrowser))
    }

    /// Creates a broker using a custom display.
    #[must_use]
    pub fn with_display(display: Arc<dyn BrowserDisplay>) -> Self {
        Self {
            display,
            wait: DEFAULT_WAIT,
        }
    }

    /// Sets how long to wait for the redirect.
    #[must_use]
    pub const fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    /// Builds a loopback callback URI for `port` and `path`.
    #[must_use]
    pub fn callback_uri(port: u16, path: &str) -> String {
        format!("http://127.0.0.1:{port}/{}", path.trim_start_matches('/'))
    }
}

impl Default for LoopbackBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LoopbackBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopbackBroker")
            .field("wait", &self.wait)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AuthBroker for LoopbackBroker {
    async fn authorize(&self, url: &str, callback_uri: &str) -> String {
        let callback = match Url::parse(callback_uri) {
            Ok(callback) => callback,
            Err(e) => {
                tracing::warn!(callback_uri, "Invalid callback URI: {e}");
                return String::new();
            }
        };
        let Some(ip) = loopback_ip(&callback) else {
            tracing::warn!(callback_uri, "Callback URI is not a loopback IP address");
            return String::new();
        };
        let Some(port) = callback.port_or_known_default() else {
            return String::new();
        };

        let listener = match TcpListener::bind(SocketAddr::new(ip, port)).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::warn!(%ip, port, "Failed to listen for callback: {e}");
                return String::new();
            }
        };

        self.display.display_in_browser(url);
        tracing::info!(%ip, port, "Waiting for authorization callback");

        match tokio::time::timeout(self.wait, accept_callback(&listener, callback.path())).await {
            Ok(Ok(target)) => target,
            Ok(Err(e)) => {
                tracing::warn!("Callback listener failed: {e}");
                String::new()
            }
            Err(_) => {
                tracing::warn!(wait = ?self.wait, "Timed out waiting for authorization callback");
                String::new()
            }
        }
    }
}

/// The literal loopback address named by `callback`, if any.
///
/// Host names such as `localhost` are refused: the browser may resolve them to
/// a different address family than the one the listener is bound to.
fn loopback_ip(callback: &Url) -> Option<IpAddr> {
    let ip = match callback.host()? {
        Host::Ipv4(ip) => IpAddr::V4(ip),
        Host::Ipv6(ip) => IpAddr::V6(ip),
        Host::Domain(_) => return None,
    };
    ip.is_loopback().then_some(ip)
}

/// Accepts connections until one requests `path`, returning its request target.
///
/// Each connection is served on its own task under [`CONNECTION_DEADLINE`];
/// idle or broken connections do not block later ones.
async fn accept_callback(listener: &TcpListener, path: &str) -> io::Result<String> {
    let (found_tx, mut found_rx) = mpsc::channel::<String>(1);
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = accepted?;
                let path = path.to_string();
                let found_tx = found_tx.clone();
                tokio::spawn(async move {
                    match tokio::time::timeout(CONNECTION_DEADLINE, serve_connection(stream, &path)).await {
                        Ok(Ok(Some(target))) => {
                            let _ = found_tx.send(target).await;
                        }
                        Ok(Ok(None)) => {}
                        Ok(Err(e)) => tracing::debug!(%peer, "Callback connection failed: {e}"),
                        Err(_) => tracing::debug!(%peer, "Callback connection sent no request"),
                    }
                });
            }
            Some(target) = found_rx.recv() => return Ok(target),
        }
    }
}

/// Answers one request. Returns its target when it hit the callback path.
async fn serve_connection(stream: TcpStream, path: &str) -> io::Result<Option<String>> {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;
    drain_headers(&mut reader).await?;

    // GET /callback?oauth_token=...&oauth_verifier=... HTTP/1.1
    let target = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_string();
    let requested_path = target.split('?').next().unwrap_or_default();

    let mut stream = reader.into_inner();
    if requested_path != path {
        tracing::debug!(requested_path, "Ignoring request outside callback path");
        stream
            .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
            .await?;
        return Ok(None);
    }

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{SUCCESS_PAGE}",
        SUCCESS_PAGE.len()
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(Some(target))
}

/// Reads up to the blank line ending the request headers.
async fn drain_headers<R>(reader: &mut R) -> io::Result<()>
where
    R: AsyncBufReadExt + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 || line.trim().is_empty() {
            return Ok(());
        }
    }
}
