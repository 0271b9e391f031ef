use std::sync::Arc;

use axum::{routing::get, Router};

use crate::AppState;

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod health;
pub mod history;
pub mod logs;
pub mod notifications;
pub mod vehicles;

/// Every API route. The two login surfaces are passed in so the caller can
/// wrap them in a rate limiter first.
pub fn api_router(
    auth_routes: Router<Arc<AppState>>,
    admin_login_routes: Router<Arc<AppState>>,
) -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api/vehicles", vehicles::router())
        .nest("/api/trips", logs::trips_router())
        .nest("/api/expenses", logs::expenses_router())
        .nest("/api/history", history::router())
        .nest("/api/notifications", notifications::router())
        .nest("/api/catalog", catalog::router())
        .nest("/api/admin", admin_login_routes.merge(admin::router()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{send, test_state};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn driver_journey_end_to_end() {
        let state = test_state().await;
        let app = || api_router(auth::router(), admin::login_router()).with_state(state.clone());

        let (status, body) = send(
            app(),
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({ "username": "driver", "password": "password123" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = format!("Bearer {}", body["token"].as_str().unwrap());

        let (_, vehicle) = send(
            app(),
            "POST",
            "/api/vehicles",
            Some(&token),
            Some(json!({ "make": "Tata", "model_name": "Nexon", "license_plate": "DL3CAB0001" })),
        )
        .await;
        let vehicle_id = vehicle["id"].as_str().unwrap().to_string();

        let (_, alerts) = send(app(), "GET", "/api/notifications", Some(&token), None).await;
        assert_eq!(alerts["notification_count"], 2);

        let (status, _) = send(
            app(),
            "POST",
            "/api/trips",
            Some(&token),
            Some(json!({
                "vehicle_id": vehicle_id,
                "date": "2026-10-16",
                "start_odometer": 0.0,
                "end_odometer": 42.0
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, vehicle) = send(
            app(),
            "GET",
            &format!("/api/vehicles/{}", vehicle_id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(vehicle["current_odometer"], 42.0);

        let (_, alerts) = send(app(), "GET", "/api/notifications", Some(&token), None).await;
        assert_eq!(alerts["notification_count"], 1);
        assert_eq!(
            alerts["notifications"][0]["message"],
            "Update Fuel Log for Nexon (Last: Never)"
        );

        let (_, history) = send(app(), "GET", "/api/history", Some(&token), None).await;
        assert_eq!(history[0]["item_type"], "trip");

        let (status, body) = send(app(), "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }
}
