//! End-to-end tests for the token exchange over HTTP.
//!
//! These run the flows through [`ReqwestTransport`] against a local
//! `wiremock` server standing in for the provider.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use featherkey_oauth1::{
    AuthBroker, BrowserDisplay, Endpoints, HttpTransport, PlatformAdaptor, ReqwestTransport, StaticCredentials,
    TokenExchange, TransportConfig,
};
use wiremock::matchers::{body_string, body_string_contains, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingDisplay {
    urls: Mutex<Vec<String>>,
}

impl BrowserDisplay for RecordingDisplay {
    fn display_in_browser(&self, url: &str) {
        self.urls.lock().unwrap().push(url.to_string());
    }
}

/// Broker that answers with a fixed redirect and records what it was given.
struct ScriptedBroker {
    payload: String,
    calls: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl AuthBroker for ScriptedBroker {
    async fn authorize(&self, url: &str, callback_uri: &str) -> String {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), callback_uri.to_string()));
        self.payload.clone()
    }
}

fn endpoints(server: &MockServer) -> Endpoints {
    Endpoints::new(
        "Mock",
        format!("{}/oauth/request_token", server.uri()),
        format!("{}/oauth/authorize", server.uri()),
        format!("{}/oauth/access_token", server.uri()),
    )
    .unwrap()
    .with_xauth_access_token_url(format!("{}/oauth/xauth", server.uri()))
    .unwrap()
}

fn transport(timeout: Duration) -> Arc<ReqwestTransport> {
    Arc::new(
        ReqwestTransport::with_config(&TransportConfig::builder().timeout(timeout).build()).unwrap(),
    )
}

#[tokio::test]
async fn pin_flow_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/request_token"))
        .and(header_exists("authorization"))
        .and(header("accept-encoding", "identity"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("oauth_token=abc&oauth_token_secret=xyz&oauth_callback_confirmed=true"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("oauth_token=T&oauth_token_secret=S&user_id=42&screen_name=bob"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let display = Arc::new(RecordingDisplay::default());
    let exchange = TokenExchange::new(
        Arc::new(StaticCredentials::new("ck", "cs")),
        PlatformAdaptor::headless(display.clone()),
        transport(Duration::from_secs(5)),
        endpoints(&server),
    );

    let token = exchange.start_authentication().await.unwrap().unwrap();
    assert_eq!(token.token, "abc");
    assert_eq!(
        *display.urls.lock().unwrap(),
        vec![format!("{}/oauth/authorize?oauth_token=abc", server.uri())]
    );

    let credential = exchange.confirm_pin("1234", &token.token).await.unwrap();
    assert!(credential.is_valid());
    assert_eq!(credential.user_id, 42);
    assert_eq!(credential.screen_name, "bob");

    let requests = server.received_requests().await.unwrap();
    let authorization = requests[0]
        .headers
        .get("authorization")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(authorization.starts_with("OAuth realm=\"\", oauth_nonce=\""));
    assert!(authorization.contains("oauth_consumer_key=\"ck\""));
    assert!(authorization.contains("oauth_signature=\""));
}

#[tokio::test]
async fn broker_flow_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/request_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("oauth_token=abc&oauth_token_secret=xyz&oauth_callback_confirmed=true"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/access_token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("oauth_verifier=ver"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("oauth_token=T&oauth_token_secret=S&user_id=9&screen_name=carol"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let broker = Arc::new(ScriptedBroker {
        payload: "/callback?oauth_token=abc&oauth_verifier=ver".to_string(),
        calls: Mutex::new(Vec::new()),
    });
    let exchange = TokenExchange::new(
        Arc::new(StaticCredentials::new("ck", "cs")),
        PlatformAdaptor::broker(broker.clone()),
        transport(Duration::from_secs(5)),
        endpoints(&server),
    );

    let credential = exchange
        .authenticate_with_broker("http://127.0.0.1:8765/callback")
        .await
        .unwrap();
    assert!(credential.is_valid());
    assert_eq!(credential.screen_name, "carol");
    assert_eq!(credential.user_id, 9);

    assert_eq!(
        *broker.calls.lock().unwrap(),
        vec![(
            format!("{}/oauth/authorize?oauth_token=abc", server.uri()),
            "http://127.0.0.1:8765/callback".to_string(),
        )]
    );

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let authorization = requests[1]
        .headers
        .get("authorization")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(authorization.contains("oauth_token=\"abc\""));
    assert!(!authorization.contains("oauth_verifier"));
    assert_eq!(String::from_utf8_lossy(&requests[1].body), "oauth_verifier=ver");
}

#[tokio::test]
async fn xauth_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/xauth"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("x_auth_mode=client_auth"))
        .and(body_string_contains("x_auth_password=p%40ss"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("oauth_token=T&oauth_token_secret=S&user_id=7&screen_name=alice"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let exchange = TokenExchange::new(
        Arc::new(StaticCredentials::new("ck", "cs")),
        PlatformAdaptor::headless(Arc::new(RecordingDisplay::default())),
        transport(Duration::from_secs(5)),
        endpoints(&server),
    );

    let credential = exchange.x_authenticate("alice", "p@ss").await.unwrap();
    assert!(credential.is_valid());
    assert_eq!(credential.screen_name, "alice");
}

#[tokio::test]
async fn http_error_is_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("oauth_token=leaked"))
        .mount(&server)
        .await;

    let body = transport(Duration::from_secs(5))
        .post_form(&format!("{}/oauth/request_token", server.uri()), "OAuth", None)
        .await;
    assert!(body.is_empty());
}

#[tokio::test]
async fn timeout_is_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("oauth_token=late")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let display = Arc::new(RecordingDisplay::default());
    let exchange = TokenExchange::new(
        Arc::new(StaticCredentials::new("ck", "cs")),
        PlatformAdaptor::headless(display.clone()),
        transport(Duration::from_millis(200)),
        endpoints(&server),
    );

    assert!(exchange.start_authentication().await.unwrap().is_none());
    assert!(display.urls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn form_body_is_sent_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/form"))
        .and(header("authorization", "OAuth realm=\"\""))
        .and(body_string("oauth_verifier=v"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok=1"))
        .expect(1)
        .mount(&server)
        .await;

    let body = transport(Duration::from_secs(5))
        .post_form(
            &format!("{}/form", server.uri()),
            "OAuth realm=\"\"",
            Some("oauth_verifier=v"),
        )
        .await;
    assert_eq!(body, "ok=1");
}
