//! Shared fixtures for unit and router tests.

use std::str::FromStr;
use std::sync::Arc;

use axum::{body::Body, http::Request, Router};
use chrono::{NaiveDate, NaiveDateTime};
use http_body_util::BodyExt;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tower::ServiceExt;

use crate::config::Config;
use crate::db::{
    CreateUser, CreateVehicle, FuelType, User, UserRepository, Vehicle, VehicleCategory,
    VehicleRepository,
};
use crate::services::auth;
use crate::services::clock::FixedClock;
use crate::AppState;

pub const TEST_JWT_SECRET: &str = "test-secret-for-fuelpulse";

/// Single-connection in-memory database with the schema applied.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    // One connection that never recycles, otherwise the in-memory db vanishes.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();

    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Midnight of the given day.
pub fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    day(y, m, d).and_hms_opt(0, 0, 0).unwrap()
}

pub fn test_now() -> NaiveDateTime {
    day(2026, 10, 16).and_hms_opt(12, 0, 0).unwrap()
}

pub async fn seed_user(pool: &SqlitePool, username: &str) -> User {
    UserRepository::create(
        pool,
        CreateUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: auth::hash_password("password123").unwrap(),
            phone_number: String::new(),
            is_staff: false,
            is_superuser: false,
        },
        test_now(),
    )
    .await
    .unwrap()
}

pub fn new_vehicle(owner_id: &str, model_name: &str) -> CreateVehicle {
    CreateVehicle {
        owner_id: owner_id.to_string(),
        category: VehicleCategory::FourWheeler,
        make: "Maruti".to_string(),
        model_name: model_name.to_string(),
        license_plate: "MH12AB1234".to_string(),
        fuel_type: FuelType::Petrol,
        ownership_type: "Personal".to_string(),
        purchase_year: 2022,
        purchase_price: 750_000.0,
        current_odometer: 100.0,
        insurance_expiry: None,
        pollution_expiry: None,
        fitness_expiry: None,
        image_url: None,
    }
}

pub async fn seed_vehicle(pool: &SqlitePool, owner_id: &str, model_name: &str) -> Vehicle {
    VehicleRepository::create(pool, new_vehicle(owner_id, model_name), test_now())
        .await
        .unwrap()
}

/// Detached vehicle for pure computations that never touch the database.
pub fn sample_vehicle(model_name: &str) -> Vehicle {
    Vehicle {
        id: format!("vehicle-{}", model_name.to_lowercase()),
        owner_id: "owner".to_string(),
        category: VehicleCategory::FourWheeler.to_string(),
        make: "Maruti".to_string(),
        model_name: model_name.to_string(),
        license_plate: "MH12AB1234".to_string(),
        fuel_type: FuelType::Petrol.to_string(),
        ownership_type: "Personal".to_string(),
        purchase_year: 2022,
        purchase_price: 750_000.0,
        target_mileage: 0.0,
        target_cost_per_km: 0.0,
        current_odometer: 100.0,
        insurance_expiry: None,
        pollution_expiry: None,
        fitness_expiry: None,
        image_url: None,
        is_active: true,
        created_at: test_now(),
        updated_at: test_now(),
    }
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.jwt.secret = TEST_JWT_SECRET.to_string();
    config
}

pub async fn test_state() -> Arc<AppState> {
    Arc::new(AppState {
        db: test_pool().await,
        config: test_config(),
        clock: Arc::new(FixedClock(test_now())),
    })
}

pub fn bearer(state: &AppState, user: &User) -> String {
    let token = auth::create_jwt(&user.id, &state.config.jwt, state.clock.now()).unwrap();
    format!("Bearer {}", token)
}

/// Fire one request at the router and decode the body: `Null` when empty,
/// a JSON string when the body is not JSON (axum's own rejections).
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (http::StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, token);
    }
    let request = match body {
        Some(json) => builder
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, json)
}
