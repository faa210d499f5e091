//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the dispatcher as its only handler
//! - Wire up middleware (tracing)
//! - Bind server to listener
//! - Dispatch requests by path: web / rpc / root / not found

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::error::ErrorResponder;
use crate::http::forward::{relay, Forwarder, ForwarderError};
use crate::http::response::{moved_permanently, not_found};
use crate::http::rpc::rpc_handler;
use crate::observability::metrics;
use crate::routing::{Resolution, RouteKind, Router as ProxyRouter};
use crate::whitelist::ValidatorRegistry;

/// Error raised while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Upstream(#[from] ForwarderError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ProxyRouter>,
    pub registry: Arc<ValidatorRegistry>,
    pub forwarder: Forwarder,
    pub responder: ErrorResponder,
    pub max_rpc_body_bytes: usize,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let registry = Arc::new(ValidatorRegistry::with_default_methods(
            &config.whitelist.download_prefix,
        ));
        let state = AppState {
            router: Arc::new(ProxyRouter::from_config(&config.routes)),
            registry,
            forwarder: Forwarder::new(&config.upstream)?,
            responder: ErrorResponder::new(config.observability.debug_mode),
            max_rpc_body_bytes: config.limits.max_rpc_body_bytes,
        };

        tracing::info!(
            methods = state.registry.len(),
            download_prefix = %config.whitelist.download_prefix,
            "RPC whitelist loaded"
        );

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.host,
            web_path = %self.config.routes.web_path,
            rpc_path = %self.config.routes.rpc_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Route the request by path.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();

    let (route, response) = match state.router.resolve(request.uri().path()) {
        Resolution::Route(kind) => {
            let response = match kind {
                RouteKind::Rpc => rpc_handler(&state, request).await,
                RouteKind::Web | RouteKind::Root => {
                    relay(&state.forwarder, &state.responder, request).await
                }
            };
            (kind.name(), response)
        }
        Resolution::Redirect(path) => {
            tracing::debug!(from = %request.uri().path(), to = %path, "Redirecting to clean path");
            ("redirect", moved_permanently(&path, request.uri().query()))
        }
        Resolution::NotFound => ("not_found", not_found()),
    };

    metrics::record_request(route, response.status().as_u16(), start);
    response
}
