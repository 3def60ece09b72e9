//! HTTP transport for the Stamhoofd endpoints.
//!
//! axum owns the socket and the middleware stack; every request that is not
//! served by an axum route (only `/health`) is converted into a
//! [`simple_endpoints::Request`] and handed to the endpoint [`Router`].

pub mod problem;
pub mod shutdown;
pub mod transport;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{body::Body, http::Request, routing::get, Json, Router};
use runtime::AppConfig;
use simple_endpoints::Router as EndpointRouter;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::transport::{dispatch, Endpoints};

/// The endpoint router with every module registered.
pub fn endpoints(config: &AppConfig) -> EndpointRouter {
    let mut router = EndpointRouter::new();
    members::register(
        &mut router,
        Arc::new(members::MemberStore::new()),
        config.api.development,
    );
    router
}

/// Build the axum application around `endpoints`.
pub fn build_app(endpoints: EndpointRouter, config: &AppConfig) -> Router {
    let state = Endpoints {
        router: endpoints,
        body_limit: config.api.body_limit_bytes,
    };

    let mut app = Router::new()
        .route("/health", get(health_check))
        .fallback(dispatch)
        .with_state(state);

    // Layers wrap outward: the last one added sees the request first.
    app = app.layer(RequestBodyLimitLayer::new(config.api.body_limit_bytes));
    if config.server.timeout_sec > 0 {
        app = app.layer(TimeoutLayer::new(Duration::from_secs(config.server.timeout_sec)));
    }
    app = app.layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
        let rid = req
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("n/a");
        tracing::info_span!(
            "http_request",
            method = %req.method(),
            uri = %req.uri(),
            request_id = %rid,
        )
    }));
    app = app.layer(PropagateRequestIdLayer::x_request_id());
    app.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Bind `server.host:server.port` and serve until a shutdown signal arrives.
pub async fn serve(config: AppConfig) -> Result<()> {
    let router = endpoints(&config);
    tracing::info!(endpoints = router.len(), "endpoints registered");
    let app = build_app(router, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("HTTP server bound on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = shutdown::wait_for_shutdown().await {
                tracing::error!(error = %err, "failed to listen for shutdown signals");
            }
            tracing::info!("HTTP server shutting down gracefully");
        })
        .await
        .context("HTTP server failed")
}
