//! Budget routes: CRUD, the projected listing, and start-date shifting.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde::Serialize;
use serde_json::json;
use tally_core::budget::{Budget, BudgetPatch, BudgetService, NewBudget};
use tally_core::day_shift::{ShiftDirection, ShiftError, shift_start_date};
use tally_core::projection::{Projection, project};
use tally_shared::AppError;
use tally_shared::types::{BudgetId, UserId, format_timestamp};
use tracing::{error, info, warn};

use crate::AppState;
use crate::error::{ApiError, ApiResult, not_found};
use crate::middleware::AuthUser;

/// Creates the budget router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budget", post(create_budget))
        .route("/budget/all", get(list_budgets))
        .route("/budget/{bid}", patch(update_budget).delete(delete_budget))
        .route("/budget/{bid}/days/{direction}", post(shift_days))
}

/// Parses a path ID. Anything that is not an ID cannot name an owned record.
pub(crate) fn parse_id<T: FromStr>(raw: &str, what: &str) -> ApiResult<T> {
    raw.parse().map_err(|_| not_found(what))
}

/// Loads a budget owned by `user_id`, or 404.
pub(crate) async fn owned_budget(
    state: &AppState,
    user_id: UserId,
    budget_id: BudgetId,
) -> ApiResult<Budget> {
    state
        .storage
        .budgets
        .find_budget(user_id, budget_id)
        .await?
        .ok_or_else(|| not_found("Budget"))
}

/// One slot of the budget listing.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum BudgetListing {
    Projected(Box<Projection>),
    Failed {
        id: BudgetId,
        error: &'static str,
        message: String,
    },
}

/// POST /budget - Create a budget.
async fn create_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<NewBudget>,
) -> ApiResult<impl IntoResponse> {
    let budget = BudgetService::create_budget(auth.user_id(), payload, state.clock.now())?;
    let budget = state.storage.budgets.create_budget(budget).await?;

    info!(budget_id = %budget.id, user_id = %budget.user_id, "Budget created");
    Ok((StatusCode::CREATED, Json(budget)))
}

/// GET /budget/all - Every owned budget, projected at the current instant.
///
/// Budgets are projected independently. One that cannot be projected
/// occupies its slot with an error object instead of failing the listing.
async fn list_budgets(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<BudgetListing>>> {
    let now = state.clock.now();
    let mut budgets = state.storage.budgets.budgets_for_user(auth.user_id()).await?;
    budgets.sort_by_key(|b| b.id);

    let mut listing = Vec::with_capacity(budgets.len());
    for budget in budgets {
        let entries = state.storage.entries.entries_for_budget(budget.id).await?;
        let id = budget.id;
        match project(&budget, &entries, now) {
            Ok(projection) => listing.push(BudgetListing::Projected(Box::new(projection))),
            Err(e) => {
                warn!(budget_id = %id, error = %e, "Budget projection failed");
                listing.push(BudgetListing::Failed {
                    id,
                    error: "internal_error",
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(Json(listing))
}

/// PATCH /budget/{bid} - Partially update a budget.
async fn update_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(bid): Path<String>,
    Json(payload): Json<BudgetPatch>,
) -> ApiResult<Json<Budget>> {
    let budget_id = parse_id(&bid, "Budget")?;
    let mut budget = owned_budget(&state, auth.user_id(), budget_id).await?;

    BudgetService::apply_patch(&mut budget, payload, state.clock.now())?;
    state.storage.budgets.update_budget(&budget).await?;

    info!(budget_id = %budget.id, "Budget updated");
    Ok(Json(budget))
}

/// DELETE /budget/{bid} - Delete a budget and its entries.
async fn delete_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(bid): Path<String>,
) -> ApiResult<StatusCode> {
    let budget_id: BudgetId = parse_id(&bid, "Budget")?;
    if !state
        .storage
        .budgets
        .delete_budget(auth.user_id(), budget_id)
        .await?
    {
        return Err(not_found("Budget"));
    }

    info!(budget_id = %budget_id, "Budget deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /budget/{bid}/days/{direction} - Move the start date by one day.
async fn shift_days(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((bid, direction)): Path<(String, String)>,
) -> ApiResult<impl IntoResponse> {
    let direction: ShiftDirection = direction.parse()?;
    let budget_id = parse_id(&bid, "Budget")?;
    let budget = owned_budget(&state, auth.user_id(), budget_id).await?;

    let start_date = shift_start_date(&budget.start_date, direction).map_err(|e| match e {
        ShiftError::Malformed(_) => {
            error!(budget_id = %budget.id, error = %e, "Stored start date is malformed");
            ApiError(AppError::Internal(e.to_string()))
        }
        ShiftError::OutOfRange => ApiError(AppError::Validation(e.to_string())),
    })?;
    state
        .storage
        .budgets
        .persist_start_date(
            budget.id,
            &start_date,
            &format_timestamp(state.clock.now()),
        )
        .await?;

    info!(budget_id = %budget.id, start_date = %start_date, "Budget start date shifted");
    Ok(Json(json!({ "startDate": start_date })))
}
