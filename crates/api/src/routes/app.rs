//! Liveness endpoint.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::AppState;

/// Liveness response.
#[derive(Serialize)]
pub struct LiveResponse {
    /// Always `OK` while the process serves requests.
    pub status: &'static str,
    /// Seconds since the router state was built.
    pub uptime: u64,
}

/// GET /app/live - Liveness check.
async fn live(State(state): State<AppState>) -> Json<LiveResponse> {
    Json(LiveResponse {
        status: "OK",
        uptime: state.started_at.elapsed().as_secs(),
    })
}

/// Creates the app routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/app/live", get(live))
}
