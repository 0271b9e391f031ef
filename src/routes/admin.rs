use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;

use crate::db::{CreateNewCar, NewCar, NewCarRepository, User, UserRepository};
use crate::error::AppResult;
use crate::routes::auth::{admin_login, StaffUser, SuperUser};
use crate::services::admin::{AdminService, DashboardStats};
use crate::AppState;

/// Admin panel login, kept separate so it can sit behind the auth rate limiter.
pub fn login_router() -> Router<Arc<AppState>> {
    Router::new().route("/login", post(admin_login))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/catalog", get(list_catalog).post(add_car))
        .route("/catalog/:id/toggle", post(toggle_car))
        .route("/catalog/:id", delete(delete_car))
        .route("/users", get(list_users))
        .route("/users/:id/toggle", post(toggle_user))
        .route("/users/:id", delete(delete_user))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CarToggleResponse {
    pub message: String,
    pub car: NewCar,
}

#[derive(Debug, Serialize)]
pub struct UserToggleResponse {
    pub message: String,
    pub user: User,
}

// ============================================================================
// Staff handlers
// ============================================================================

async fn dashboard(
    State(state): State<Arc<AppState>>,
    StaffUser(_staff): StaffUser,
) -> AppResult<Json<DashboardStats>> {
    Ok(Json(AdminService::dashboard(&state.db).await?))
}

async fn list_catalog(
    State(state): State<Arc<AppState>>,
    StaffUser(_staff): StaffUser,
) -> AppResult<Json<Vec<NewCar>>> {
    Ok(Json(NewCarRepository::list_all(&state.db).await?))
}

async fn add_car(
    State(state): State<Arc<AppState>>,
    StaffUser(_staff): StaffUser,
    Json(car): Json<CreateNewCar>,
) -> AppResult<(StatusCode, Json<NewCar>)> {
    let car = AdminService::add_car(&state.db, car, state.clock.now()).await?;
    Ok((StatusCode::CREATED, Json(car)))
}

async fn toggle_car(
    State(state): State<Arc<AppState>>,
    StaffUser(_staff): StaffUser,
    Path(id): Path<String>,
) -> AppResult<Json<CarToggleResponse>> {
    let (car, message) = AdminService::toggle_car(&state.db, &id).await?;
    Ok(Json(CarToggleResponse { message, car }))
}

async fn delete_car(
    State(state): State<Arc<AppState>>,
    StaffUser(_staff): StaffUser,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let message = AdminService::delete_car(&state.db, &id).await?;
    Ok(Json(serde_json::json!({ "message": message })))
}

// ============================================================================
// Superuser handlers
// ============================================================================

async fn list_users(
    State(state): State<Arc<AppState>>,
    SuperUser(_admin): SuperUser,
) -> AppResult<Json<Vec<User>>> {
    Ok(Json(UserRepository::list_non_superusers(&state.db).await?))
}

async fn toggle_user(
    State(state): State<Arc<AppState>>,
    SuperUser(_admin): SuperUser,
    Path(id): Path<String>,
) -> AppResult<Json<UserToggleResponse>> {
    let (user, message) = AdminService::toggle_user(&state.db, &id).await?;
    Ok(Json(UserToggleResponse { message, user }))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    SuperUser(_admin): SuperUser,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let message = AdminService::delete_user(&state.db, &id).await?;
    Ok(Json(serde_json::json!({ "message": message })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::hash_password;
    use crate::testing::{bearer, seed_user, send, test_now, test_state};
    use serde_json::json;

    fn app(state: Arc<AppState>) -> Router {
        Router::new()
            .nest("/api/admin", login_router().merge(router()))
            .with_state(state)
    }

    async fn superuser(state: &AppState) -> User {
        UserRepository::ensure_superuser(&state.db, "root", &hash_password("rootpass1").unwrap(), test_now())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn admin_login_only_for_superusers() {
        let state = test_state().await;
        seed_user(&state.db, "plain").await;
        superuser(&state).await;

        let (status, _) = send(
            app(state.clone()),
            "POST",
            "/api/admin/login",
            None,
            Some(json!({ "username": "plain", "password": "password123" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(
            app(state),
            "POST",
            "/api/admin/login",
            None,
            Some(json!({ "username": "root", "password": "rootpass1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["is_superuser"], true);
    }

    #[tokio::test]
    async fn plain_users_are_kept_out() {
        let state = test_state().await;
        let user = seed_user(&state.db, "plain").await;
        let token = bearer(&state, &user);

        let (status, _) = send(app(state.clone()), "GET", "/api/admin/dashboard", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = send(app(state), "GET", "/api/admin/dashboard", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn staff_manage_catalog_but_not_users() {
        let state = test_state().await;
        let staff = seed_user(&state.db, "staffer").await;
        sqlx::query("UPDATE users SET is_staff = 1 WHERE id = ?")
            .bind(&staff.id)
            .execute(&state.db)
            .await
            .unwrap();
        let token = bearer(&state, &staff);

        let (status, car) = send(
            app(state.clone()),
            "POST",
            "/api/admin/catalog",
            Some(&token),
            Some(json!({ "make": "Kia", "model": "Syros", "car_type": "SUV", "price_lakhs": 9.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            app(state.clone()),
            "POST",
            &format!("/api/admin/catalog/{}/toggle", car["id"].as_str().unwrap()),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Kia Syros is now Hidden");

        let (_, dash) = send(app(state.clone()), "GET", "/api/admin/dashboard", Some(&token), None).await;
        assert_eq!(dash, json!({ "total_users": 1, "total_db_cars": 1, "suspended_users": 0 }));

        let (status, _) = send(app(state), "GET", "/api/admin/users", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn superuser_suspends_users_who_then_lose_access() {
        let state = test_state().await;
        let root = superuser(&state).await;
        let user = seed_user(&state.db, "ravi").await;
        let root_token = bearer(&state, &root);
        let user_token = bearer(&state, &user);

        let (status, body) = send(
            app(state.clone()),
            "POST",
            &format!("/api/admin/users/{}/toggle", user.id),
            Some(&root_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User ravi has been suspended.");

        let (status, _) = send(app(state.clone()), "GET", "/api/admin/users", Some(&user_token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            app(state),
            "DELETE",
            &format!("/api/admin/users/{}", root.id),
            Some(&root_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
