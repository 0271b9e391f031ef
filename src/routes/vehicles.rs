use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

use crate::db::{FuelLog, MaintenanceLog, UpdateVehicleDocuments, Vehicle, VehicleRepository};
use crate::error::AppResult;
use crate::routes::auth::AuthUser;
use crate::services::fuel::{FuelFillInput, FuelService};
use crate::services::metrics::VehicleStats;
use crate::services::vehicles::{MaintenanceInput, NewVehicleRequest, VehicleService};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/:id", get(get_vehicle).delete(remove_vehicle))
        .route("/:id/documents", put(update_documents))
        .route("/:id/targets", put(update_targets))
        .route("/:id/stats", get(vehicle_stats))
        .route("/:id/maintenance", post(log_maintenance))
        .route("/:id/fuel", post(log_fuel))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TargetsRequest {
    pub target_mileage: f64,
    pub target_cost_per_km: f64,
}

// ============================================================================
// Handlers
// ============================================================================

async fn list_vehicles(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<Vec<Vehicle>>> {
    let vehicles = VehicleRepository::find_active_by_owner(&state.db, &user.id).await?;
    Ok(Json(vehicles))
}

async fn create_vehicle(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(request): Json<NewVehicleRequest>,
) -> AppResult<(StatusCode, Json<Vehicle>)> {
    let vehicle = VehicleService::create(&state.db, &user, request, state.clock.now()).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

async fn get_vehicle(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vehicle>> {
    Ok(Json(VehicleService::get(&state.db, &user, &id).await?))
}

async fn remove_vehicle(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    VehicleService::remove(&state.db, &user, &id, state.clock.now()).await?;
    Ok(Json(serde_json::json!({ "message": "Vehicle removed" })))
}

async fn update_documents(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(docs): Json<UpdateVehicleDocuments>,
) -> AppResult<Json<Vehicle>> {
    let vehicle =
        VehicleService::update_documents(&state.db, &user, &id, docs, state.clock.now()).await?;
    Ok(Json(vehicle))
}

async fn update_targets(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(request): Json<TargetsRequest>,
) -> AppResult<Json<Vehicle>> {
    let vehicle = VehicleService::update_targets(
        &state.db,
        &user,
        &id,
        request.target_mileage,
        request.target_cost_per_km,
        state.clock.now(),
    )
    .await?;
    Ok(Json(vehicle))
}

async fn vehicle_stats(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<VehicleStats>> {
    Ok(Json(VehicleService::stats(&state.db, &user, &id).await?))
}

async fn log_maintenance(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(input): Json<MaintenanceInput>,
) -> AppResult<(StatusCode, Json<MaintenanceLog>)> {
    let log = VehicleService::log_maintenance(&state.db, &user, &id, input, state.clock.today()).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

async fn log_fuel(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Json(input): Json<FuelFillInput>,
) -> AppResult<(StatusCode, Json<FuelLog>)> {
    let log = FuelService::log_fill(&state.db, &user, &id, input, state.clock.now()).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{bearer, seed_user, seed_vehicle, send, test_state};
    use serde_json::json;

    fn app(state: Arc<AppState>) -> Router {
        Router::new().nest("/api/vehicles", router()).with_state(state)
    }

    #[tokio::test]
    async fn create_list_and_remove() {
        let state = test_state().await;
        let user = seed_user(&state.db, "owner").await;
        let token = bearer(&state, &user);

        let (status, created) = send(
            app(state.clone()),
            "POST",
            "/api/vehicles",
            Some(&token),
            Some(json!({
                "make": "Honda",
                "model_name": "City",
                "license_plate": "KA01MX2020",
                "fuel_type": "CNG",
                "insurance_expiry": "2026-10-20"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["fuel_type"], "CNG");
        let id = created["id"].as_str().unwrap().to_string();

        let (_, list) = send(app(state.clone()), "GET", "/api/vehicles", Some(&token), None).await;
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, _) = send(
            app(state.clone()),
            "DELETE",
            &format!("/api/vehicles/{}", id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, list) = send(app(state), "GET", "/api/vehicles", Some(&token), None).await;
        assert!(list.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn other_users_vehicle_is_not_found() {
        let state = test_state().await;
        let owner = seed_user(&state.db, "owner").await;
        let other = seed_user(&state.db, "other").await;
        let car = seed_vehicle(&state.db, &owner.id, "Swift").await;

        let (status, _) = send(
            app(state.clone()),
            "GET",
            &format!("/api/vehicles/{}/stats", car.id),
            Some(&bearer(&state, &other)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn documents_and_fuel_flow() {
        let state = test_state().await;
        let owner = seed_user(&state.db, "owner").await;
        let car = seed_vehicle(&state.db, &owner.id, "Swift").await;
        let token = bearer(&state, &owner);

        let (status, updated) = send(
            app(state.clone()),
            "PUT",
            &format!("/api/vehicles/{}/documents", car.id),
            Some(&token),
            Some(json!({ "pollution_expiry": "2026-11-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["pollution_expiry"], "2026-11-01");
        assert!(updated["insurance_expiry"].is_null());

        for (odometer, liters) in [(1000, 30.0), (1500, 25.0)] {
            let (status, _) = send(
                app(state.clone()),
                "POST",
                &format!("/api/vehicles/{}/fuel", car.id),
                Some(&token),
                Some(json!({
                    "odometer_reading": odometer,
                    "liters_filled": liters,
                    "total_cost": 2500.0
                })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (_, stats) = send(
            app(state),
            "GET",
            &format!("/api/vehicles/{}/stats", car.id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(stats["fill_count"], 2);
        assert_eq!(stats["latest_km_per_liter"], 20.0);
    }
}
