use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};

use crate::db::{ExpenseLog, TripInput};
use crate::error::AppResult;
use crate::routes::auth::AuthUser;
use crate::services::trips::{SavedTrip, TripService};
use crate::services::vehicles::{ExpenseInput, VehicleService};
use crate::AppState;

pub fn trips_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_trip))
        .route("/:id", put(update_trip))
}

pub fn expenses_router() -> Router<Arc<AppState>> {
    Router::new().route("/", post(create_expense))
}

async fn create_trip(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(input): Json<TripInput>,
) -> AppResult<(StatusCode, Json<SavedTrip>)> {
    let saved = TripService::create(&state.db, &user, input, state.clock.now()).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn update_trip(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(input): Json<TripInput>,
) -> AppResult<Json<SavedTrip>> {
    let saved = TripService::update(&state.db, &user, &id, input, state.clock.now()).await?;
    Ok(Json(saved))
}

async fn create_expense(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(input): Json<ExpenseInput>,
) -> AppResult<(StatusCode, Json<ExpenseLog>)> {
    let expense = VehicleService::log_expense(&state.db, &user, input, state.clock.now()).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}
