use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Serialize;

use crate::db::{
    ExpenseLog, ExpenseLogRepository, FuelLog, FuelLogRepository, MaintenanceLog,
    MaintenanceLogRepository, TripLog, TripLogRepository,
};
use crate::error::{AppError, AppErrorWithDetails, AppResult};
use crate::routes::auth::AuthUser;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_history))
        .route("/:item_type/:id", delete(delete_item))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// One row of the combined timeline, tagged with `item_type`.
#[derive(Debug, Serialize)]
#[serde(tag = "item_type", rename_all = "lowercase")]
pub enum HistoryEntry {
    Fuel(FuelLog),
    Trip(TripLog),
    Expense(ExpenseLog),
    Maintenance(MaintenanceLog),
}

impl HistoryEntry {
    fn day(&self) -> NaiveDate {
        match self {
            HistoryEntry::Fuel(f) => f.date.date(),
            HistoryEntry::Trip(t) => t.date,
            HistoryEntry::Expense(e) => e.date,
            HistoryEntry::Maintenance(m) => m.date,
        }
    }
}

const ITEM_TYPES: [&str; 4] = ["fuel", "trip", "expense", "maintenance"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemType {
    Fuel,
    Trip,
    Expense,
    Maintenance,
}

impl std::str::FromStr for ItemType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fuel" => Ok(ItemType::Fuel),
            "trip" => Ok(ItemType::Trip),
            "expense" => Ok(ItemType::Expense),
            "maintenance" => Ok(ItemType::Maintenance),
            other => Err(AppError::BadRequest(format!("Unknown item type: {}", other))),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn list_history(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    let mut entries: Vec<HistoryEntry> = Vec::new();
    entries.extend(
        FuelLogRepository::list_for_owner(&state.db, &user.id)
            .await?
            .into_iter()
            .map(HistoryEntry::Fuel),
    );
    entries.extend(
        TripLogRepository::list_for_owner(&state.db, &user.id)
            .await?
            .into_iter()
            .map(HistoryEntry::Trip),
    );
    entries.extend(
        ExpenseLogRepository::list_for_owner(&state.db, &user.id)
            .await?
            .into_iter()
            .map(HistoryEntry::Expense),
    );
    entries.extend(
        MaintenanceLogRepository::list_for_owner(&state.db, &user.id)
            .await?
            .into_iter()
            .map(HistoryEntry::Maintenance),
    );

    // stable: each source list is already newest first
    entries.sort_by(|a, b| b.day().cmp(&a.day()));
    Ok(Json(entries))
}

async fn delete_item(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path((item_type, id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, AppErrorWithDetails> {
    let item_type: ItemType = item_type
        .parse()
        .map_err(|e: AppError| e.with_details(serde_json::json!({ "allowed": ITEM_TYPES })))?;

    let deleted = match item_type {
        ItemType::Fuel => FuelLogRepository::delete_owned(&state.db, &id, &user.id).await?,
        ItemType::Trip => TripLogRepository::delete_owned(&state.db, &id, &user.id).await?,
        ItemType::Expense => ExpenseLogRepository::delete_owned(&state.db, &id, &user.id).await?,
        ItemType::Maintenance => {
            MaintenanceLogRepository::delete_owned(&state.db, &id, &user.id).await?
        }
    };

    if !deleted {
        return Err(AppError::NotFound("Record not found".to_string()).into());
    }

    tracing::info!("User {} deleted {:?} record {}", user.id, item_type, id);
    Ok(Json(serde_json::json!({ "message": "Record deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{CreateExpenseLog, ExpenseType};
    use crate::testing::{bearer, day, seed_user, seed_vehicle, send, test_now, test_state};
    use axum::http::StatusCode;

    fn app(state: Arc<AppState>) -> Router {
        Router::new().nest("/api/history", router()).with_state(state)
    }

    async fn expense_on(state: &AppState, vehicle_id: &str, user_id: &str, d: u32) -> ExpenseLog {
        ExpenseLogRepository::create(
            &state.db,
            CreateExpenseLog {
                vehicle_id: vehicle_id.to_string(),
                user_id: user_id.to_string(),
                date: day(2026, 10, d),
                expense_type: ExpenseType::Cleaning,
                amount: 300.0,
                notes: None,
            },
            test_now(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn history_is_newest_first_and_tagged() {
        let state = test_state().await;
        let owner = seed_user(&state.db, "owner").await;
        let car = seed_vehicle(&state.db, &owner.id, "Swift").await;
        expense_on(&state, &car.id, &owner.id, 2).await;
        expense_on(&state, &car.id, &owner.id, 9).await;

        let (status, body) = send(
            app(state.clone()),
            "GET",
            "/api/history",
            Some(&bearer(&state, &owner)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["item_type"], "expense");
        assert_eq!(items[0]["date"], "2026-10-09");
    }

    #[tokio::test]
    async fn delete_checks_type_and_owner() {
        let state = test_state().await;
        let owner = seed_user(&state.db, "owner").await;
        let other = seed_user(&state.db, "other").await;
        let car = seed_vehicle(&state.db, &owner.id, "Swift").await;
        let expense = expense_on(&state, &car.id, &owner.id, 2).await;

        let (status, body) = send(
            app(state.clone()),
            "DELETE",
            &format!("/api/history/parking/{}", expense.id),
            Some(&bearer(&state, &owner)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["details"]["allowed"][0], "fuel");

        let (status, _) = send(
            app(state.clone()),
            "DELETE",
            &format!("/api/history/expense/{}", expense.id),
            Some(&bearer(&state, &other)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            app(state.clone()),
            "DELETE",
            &format!("/api/history/expense/{}", expense.id),
            Some(&bearer(&state, &owner)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}
