//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for auth, budgets and spends
//! - Authentication middleware
//! - Error-to-response mapping

pub mod error;
pub mod middleware;
pub mod routes;

#[cfg(test)]
mod test_support;

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::http::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use tally_core::clock::Clock;
use tally_core::store::Storage;
use tally_shared::JwtService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::{
    SetSensitiveRequestHeadersLayer, SetSensitiveResponseHeadersLayer,
};
use tower_http::trace::TraceLayer;

/// Attributes applied to the auth cookies.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    /// `Domain` attribute.
    pub domain: String,
    /// Whether to mark cookies `Secure`.
    pub secure: bool,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Persistence.
    pub storage: Storage,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Source of the reference instant for projections and bookkeeping.
    pub clock: Arc<dyn Clock>,
    /// Auth cookie attributes.
    pub cookies: CookieSettings,
    /// Process start, for the liveness uptime.
    pub started_at: Instant,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetSensitiveResponseHeadersLayer::new([SET_COOKIE]))
        .layer(SetSensitiveRequestHeadersLayer::new([AUTHORIZATION, COOKIE]))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
