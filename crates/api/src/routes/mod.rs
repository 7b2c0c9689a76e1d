//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod app;
pub mod auth;
pub mod budgets;
pub mod spends;

/// Creates the API router, layering the auth middleware over protected routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(budgets::routes())
        .merge(spends::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(app::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
