//! Upstream forwarding.
//!
//! # Responsibilities
//! - Rewrite the request URI onto the upstream base URL, keeping path and query
//! - Send it through a pooled client that never follows redirects, over
//!   plain http or TLS as the upstream URL says
//! - Relay status, headers and a streamed body back to the client
//!
//! # Design Decisions
//! - Method, end-to-end headers and body are forwarded verbatim
//! - No retries: a transport failure is reported once as 502
//! - Time to response headers and pauses in the body stream are bounded
//! - Dropping the returned future (client gone) cancels the upstream call

use std::time::Duration;

use axum::body::Body;
use axum::http::uri::{Authority, InvalidUri, PathAndQuery, Scheme};
use axum::http::{Request, Uri, Version};
use axum::response::Response;
use http_body_util::BodyExt;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use tower_http::timeout::TimeoutBody;

use crate::config::UpstreamConfig;
use crate::http::error::{ErrorResponder, ProxyError};
use crate::rpc::RpcTag;
use crate::security::headers::strip_hop_by_hop;

/// Error raised while building the upstream client.
#[derive(Debug, Error)]
pub enum ForwarderError {
    #[error("invalid upstream address: {0}")]
    Address(#[from] InvalidUri),

    #[error("cannot set up TLS: {0}")]
    Tls(#[from] rustls::Error),
}

/// Sends requests to the upstream daemon.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpsConnector<HttpConnector>, Body>,
    scheme: Scheme,
    authority: Authority,
    response_timeout: Duration,
    body_idle_timeout: Duration,
}

impl std::fmt::Debug for Forwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forwarder")
            .field("upstream", &format_args!("{}://{}", self.scheme, self.authority))
            .field("response_timeout", &self.response_timeout)
            .field("body_idle_timeout", &self.body_idle_timeout)
            .finish()
    }
}

impl Forwarder {
    pub fn new(config: &UpstreamConfig) -> Result<Self, ForwarderError> {
        let scheme = config.host.scheme().parse::<Scheme>()?;
        let host = config.host.host_str().unwrap_or_default();
        let authority = match config.host.port_or_known_default() {
            Some(port) => format!("{host}:{port}").parse::<Authority>()?,
            None => host.parse::<Authority>()?,
        };

        let mut http = HttpConnector::new();
        http.enforce_http(false);
        http.set_connect_timeout(Some(config.connect_timeout()));
        let connector = HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(rustls::crypto::ring::default_provider())?
            .https_or_http()
            .enable_http1()
            .wrap_connector(http);
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            client,
            scheme,
            authority,
            response_timeout: config.response_timeout(),
            body_idle_timeout: config.body_idle_timeout(),
        })
    }

    /// Absolute upstream URI for an inbound request URI.
    pub fn upstream_uri(&self, inbound: &Uri) -> Result<Uri, ProxyError> {
        let path_and_query = inbound
            .path_and_query()
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
            .map_err(ProxyError::UpstreamUri)
    }

    /// Send `request` upstream and return the upstream response, body streaming.
    pub async fn forward(&self, request: Request<Body>) -> Result<Response, ProxyError> {
        let (mut parts, body) = request.into_parts();
        parts.uri = self.upstream_uri(&parts.uri)?;
        parts.version = Version::HTTP_11;
        strip_hop_by_hop(&mut parts.headers);

        tracing::debug!(method = %parts.method, uri = %parts.uri, "Forwarding to upstream");

        let response = tokio::time::timeout(
            self.response_timeout,
            self.client.request(Request::from_parts(parts, body)),
        )
        .await
        .map_err(|_| ProxyError::UpstreamTimeout(self.response_timeout))?
        .map_err(ProxyError::Upstream)?;

        let (mut parts, body) = response.into_parts();
        strip_hop_by_hop(&mut parts.headers);

        let body = TimeoutBody::new(self.body_idle_timeout, body).map_err(|e| {
            tracing::error!(error = %e, "proxy: failed to write response");
            e
        });

        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

/// Forward `request`, answering with an error response on failure. The RPC
/// tag, if the request carries one, is echoed in that error response.
pub async fn relay(
    forwarder: &Forwarder,
    responder: &ErrorResponder,
    request: Request<Body>,
) -> Response {
    let tag = request
        .extensions()
        .get::<RpcTag>()
        .map_or(0, |RpcTag(tag)| *tag);

    match forwarder.forward(request).await {
        Ok(response) => response,
        Err(e) => responder.respond(&e, tag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn forwarder(host: &str) -> Forwarder {
        let config = UpstreamConfig {
            host: Url::parse(host).unwrap(),
            ..UpstreamConfig::default()
        };
        Forwarder::new(&config).unwrap()
    }

    #[test]
    fn test_upstream_uri_keeps_path_and_query() {
        let forwarder = forwarder("http://transmission:9091");
        let uri = forwarder
            .upstream_uri(&"/transmission/web/index.html?lang=en".parse().unwrap())
            .unwrap();

        assert_eq!(uri.to_string(), "http://transmission:9091/transmission/web/index.html?lang=en");
    }

    #[test]
    fn test_upstream_uri_default_port() {
        let forwarder = forwarder("http://transmission/");
        let uri = forwarder.upstream_uri(&"/".parse().unwrap()).unwrap();

        assert_eq!(uri.to_string(), "http://transmission:80/");
    }

    #[test]
    fn test_upstream_uri_keeps_https() {
        let forwarder = forwarder("https://transmission.example");
        let uri = forwarder
            .upstream_uri(&"/transmission/rpc".parse().unwrap())
            .unwrap();

        assert_eq!(uri.to_string(), "https://transmission.example:443/transmission/rpc");
    }

    #[test]
    fn test_upstream_uri_replaces_absolute_form() {
        let forwarder = forwarder("http://127.0.0.1:9091");
        let uri = forwarder
            .upstream_uri(&"http://proxy.example/transmission/rpc".parse().unwrap())
            .unwrap();

        assert_eq!(uri.to_string(), "http://127.0.0.1:9091/transmission/rpc");
    }
}
