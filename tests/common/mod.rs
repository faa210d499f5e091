//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{to_bytes, Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};
use axum::Router;
use serde_json::json;
use tokio::net::TcpListener;
use url::Url;

use transmission_proxy::config::ProxyConfig;
use transmission_proxy::http::HttpServer;
use transmission_proxy::lifecycle::Shutdown;

pub const DOWNLOAD_PREFIX: &str = "/downloads/";

/// A request as seen by the mock upstream.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Recorded {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    #[allow(dead_code)]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

pub type RequestLog = Arc<Mutex<Vec<Recorded>>>;

/// Start a mock Transmission daemon on an ephemeral port.
pub async fn start_mock_upstream() -> (SocketAddr, RequestLog) {
    let log = RequestLog::default();
    let app = Router::new().fallback(upstream_handler).with_state(log.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, log)
}

async fn upstream_handler(State(log): State<RequestLog>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, usize::MAX).await.unwrap_or_default();
    log.lock().unwrap().push(Recorded {
        method: parts.method,
        uri: parts.uri.clone(),
        headers: parts.headers,
        body,
    });

    match parts.uri.path() {
        "/transmission/rpc" => (
            [("x-transmission-session-id", "session-1")],
            Json(json!({"result": "success", "arguments": {}})),
        )
            .into_response(),
        "/transmission/web/moved" => (
            StatusCode::FOUND,
            [(header::LOCATION, "/transmission/web/")],
        )
            .into_response(),
        "/transmission/web/teapot" => (
            StatusCode::IM_A_TEAPOT,
            [("x-upstream", "teapot"), ("content-type", "text/plain")],
            "short and stout",
        )
            .into_response(),
        "/" => "root".into_response(),
        _ => (
            [("x-upstream", "web"), ("content-type", "text/html")],
            "<html>web</html>",
        )
            .into_response(),
    }
}

/// Start an upstream that accepts connections but never answers.
#[allow(dead_code)]
pub async fn start_silent_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub fn proxy_config(upstream: SocketAddr, debug_mode: bool) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.whitelist.download_prefix = DOWNLOAD_PREFIX.into();
    config.upstream.host = Url::parse(&format!("http://{upstream}")).unwrap();
    config.observability.debug_mode = debug_mode;
    config
}

/// Start the proxy with `config` on an ephemeral port.
pub async fn start_proxy(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config).unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client that never follows redirects.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}
