//! Spend routes: entries recorded against a budget.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{patch, post},
};
use tally_core::budget::{BudgetService, Entry, EntryPatch, NewEntry};
use tally_shared::types::{BudgetId, EntryId};
use tracing::info;

use super::budgets::{owned_budget, parse_id};
use crate::AppState;
use crate::error::{ApiResult, not_found};
use crate::middleware::AuthUser;

/// Creates the spend router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budget/{bid}/spend", post(create_spend))
        .route(
            "/budget/{bid}/spend/{sid}",
            patch(update_spend).delete(delete_spend),
        )
}

/// POST /budget/{bid}/spend - Record an entry.
async fn create_spend(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(bid): Path<String>,
    Json(payload): Json<NewEntry>,
) -> ApiResult<impl IntoResponse> {
    let budget_id = parse_id(&bid, "Budget")?;
    let budget = owned_budget(&state, auth.user_id(), budget_id).await?;

    let entry = BudgetService::create_entry(&budget, payload, state.clock.now())?;
    let entry = state.storage.entries.create_entry(entry).await?;

    info!(budget_id = %budget.id, entry_id = %entry.id, "Spend recorded");
    Ok((StatusCode::CREATED, Json(entry)))
}

/// PATCH /budget/{bid}/spend/{sid} - Partially update an entry.
async fn update_spend(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((bid, sid)): Path<(String, String)>,
    Json(payload): Json<EntryPatch>,
) -> ApiResult<Json<Entry>> {
    let budget_id: BudgetId = parse_id(&bid, "Spend")?;
    let entry_id: EntryId = parse_id(&sid, "Spend")?;
    let mut entry = state
        .storage
        .entries
        .find_entry(auth.user_id(), budget_id, entry_id)
        .await?
        .ok_or_else(|| not_found("Spend"))?;

    BudgetService::apply_entry_patch(&mut entry, payload, state.clock.now())?;
    state.storage.entries.update_entry(&entry).await?;

    info!(entry_id = %entry.id, "Spend updated");
    Ok(Json(entry))
}

/// DELETE /budget/{bid}/spend/{sid} - Delete an entry.
async fn delete_spend(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((bid, sid)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let budget_id: BudgetId = parse_id(&bid, "Spend")?;
    let entry_id: EntryId = parse_id(&sid, "Spend")?;
    if !state
        .storage
        .entries
        .delete_entry(auth.user_id(), budget_id, entry_id)
        .await?
    {
        return Err(not_found("Spend"));
    }

    info!(entry_id = %entry_id, "Spend deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use tally_shared::types::BudgetId;

    use crate::test_support::{TestApp, fixed_now};

    async fn app_with_budget() -> (TestApp, String, String) {
        let app = TestApp::new(fixed_now());
        let token = app.register("alice").await;
        let bid = app
            .create_budget(
                &token,
                json!({ "name": "Groceries", "limit": 35000, "periodLimit": 5000 }),
            )
            .await;
        (app, token, bid)
    }

    #[tokio::test]
    async fn test_create_spend() {
        let (app, token, bid) = app_with_budget().await;

        let (status, body) = app
            .send(
                Method::POST,
                &format!("/budget/{bid}/spend"),
                Some(&token),
                Some(json!({
                    "cost": -1500,
                    "category": "food",
                    "description": "market",
                    "repeat": "monthly"
                })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["budgetId"], bid.as_str());
        assert_eq!(body["cost"], -1500);
        assert_eq!(body["isCredit"], false);
        assert_eq!(body["description"], "market");
        assert_eq!(body["repeat"], "monthly");
        assert_eq!(body["date"], serde_json::Value::Null);
        assert_eq!(body["createdAt"], "2024-03-01T00:00:00.0Z");
    }

    #[tokio::test]
    async fn test_create_spend_errors() {
        let (app, token, bid) = app_with_budget().await;

        let (status, _) = app
            .send(
                Method::POST,
                &format!("/budget/{}/spend", BudgetId::new()),
                Some(&token),
                Some(json!({ "cost": -1, "category": "x" })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = app
            .send(
                Method::POST,
                &format!("/budget/{bid}/spend"),
                Some(&token),
                Some(json!({ "cost": -1, "category": "x", "date": "next week" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");

        let other = app.register("bob").await;
        let (status, _) = app
            .send(
                Method::POST,
                &format!("/budget/{bid}/spend"),
                Some(&other),
                Some(json!({ "cost": -1, "category": "x" })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_spend_clears_planned_date() {
        let (app, token, bid) = app_with_budget().await;
        let (_, created) = app
            .send(
                Method::POST,
                &format!("/budget/{bid}/spend"),
                Some(&token),
                Some(json!({
                    "cost": -3000,
                    "category": "rent",
                    "date": "2024-03-10T00:00:00.0Z"
                })),
            )
            .await;
        let sid = created["id"].as_str().unwrap();
        let uri = format!("/budget/{bid}/spend/{sid}");

        let (status, body) = app
            .send(
                Method::PATCH,
                &uri,
                Some(&token),
                Some(json!({ "cost": -3500, "date": null })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cost"], -3500);
        assert_eq!(body["date"], serde_json::Value::Null);
        assert_eq!(body["category"], "rent");

        let (_, listing) = app
            .send(Method::GET, "/budget/all", Some(&token), None)
            .await;
        assert_eq!(listing[0]["monthSpend"], -3500);
    }

    #[tokio::test]
    async fn test_update_missing_spend() {
        let (app, token, bid) = app_with_budget().await;

        let (status, _) = app
            .send(
                Method::PATCH,
                &format!("/budget/{bid}/spend/{}", BudgetId::new()),
                Some(&token),
                Some(json!({ "cost": 1 })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_spend() {
        let (app, token, bid) = app_with_budget().await;
        let (_, created) = app
            .send(
                Method::POST,
                &format!("/budget/{bid}/spend"),
                Some(&token),
                Some(json!({ "cost": -100, "category": "coffee" })),
            )
            .await;
        let uri = format!("/budget/{bid}/spend/{}", created["id"].as_str().unwrap());

        let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
