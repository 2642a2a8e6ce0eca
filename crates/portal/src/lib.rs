//! FreshWash portal library.
//!
//! Server-rendered pages for every FreshWash role, backed by the laundry
//! REST API. Exposed as a library so the router can be driven in tests
//! without binding a socket.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod query;
pub mod resources;
pub mod routes;
pub mod state;
pub mod views;

use axum::{Router, middleware::from_fn, middleware::from_fn_with_state};
use tower::ServiceBuilder;
use tower_http::{
    services::ServeDir,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::Span;

use crate::middleware::{create_session_layer, request_id_middleware, route_guard};
use crate::state::AppState;

/// Build the full application router.
///
/// Layer order, outermost first: Sentry, request span, request ID,
/// session, route guard, handlers.
pub fn app(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
                status = tracing::field::Empty,
                latency_ms = tracing::field::Empty,
            )
        })
        .on_response(
            |response: &axum::http::Response<_>, latency: std::time::Duration, span: &Span| {
                span.record("status", response.status().as_u16());
                span.record(
                    "latency_ms",
                    u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                );
                DefaultOnResponse::default().on_response(response, latency, span);
            },
        );

    let stack = ServiceBuilder::new()
        .layer(trace_layer)
        .layer(from_fn(request_id_middleware))
        .layer(create_session_layer(state.config()))
        .layer(from_fn_with_state(state.clone(), route_guard));

    Router::new()
        .merge(routes::routes())
        .nest_service(
            "/static",
            ServeDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        )
        .layer(stack)
        .with_state(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
