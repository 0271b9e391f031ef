use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::request::Parts,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::{UpdateProfile, User, UserRepository};
use crate::error::{AppError, AppResult};
use crate::services::auth::{create_jwt, AuthService, SignupRequest};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me).put(update_me))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMeRequest {
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

fn issue_token(state: &AppState, user: User) -> AppResult<Json<AuthResponse>> {
    let token = create_jwt(&user.id, &state.config.jwt, state.clock.now())?;
    Ok(Json(AuthResponse { token, user }))
}

// ============================================================================
// Handlers
// ============================================================================

async fn signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignupRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = AuthService::signup(&state.db, request, state.clock.now()).await?;
    issue_token(&state, user)
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = AuthService::login(&state.db, &request.username, &request.password, state.clock.now())
        .await?;
    tracing::info!("User {} logged in", user.id);
    issue_token(&state, user)
}

/// Login for the admin panel. Valid credentials of a non-superuser are 403.
pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = AuthService::login(&state.db, &request.username, &request.password, state.clock.now())
        .await?;
    if !user.is_admin() {
        tracing::warn!("Non-admin {} tried the admin login", user.id);
        return Err(AppError::Forbidden);
    }
    tracing::info!("Admin {} logged in", user.id);
    issue_token(&state, user)
}

/// Tokens are stateless; the client discards its copy.
async fn logout() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Logged out" }))
}

async fn me(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

async fn update_me(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(request): Json<UpdateMeRequest>,
) -> AppResult<Json<User>> {
    let updated = UserRepository::update_profile(
        &state.db,
        &user.id,
        UpdateProfile {
            email: request.email.map(|e| e.trim().to_string()),
            phone_number: request.phone_number.map(|p| p.trim().to_string()),
        },
    )
    .await?;
    Ok(Json(updated))
}

// ============================================================================
// Extractors
// ============================================================================

fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts
        .headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())?;

    if header.len() < 7 || !header[..7].eq_ignore_ascii_case("bearer ") {
        tracing::debug!("Authorization header doesn't start with 'Bearer '");
        return None;
    }

    let token = header[7..].trim();
    (!token.is_empty()).then_some(token)
}

/// Extractor for an authenticated, active user
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            tracing::debug!("Missing or invalid Authorization header");
            AppError::Unauthorized
        })?;

        let user = AuthService::get_user_from_token(&state.db, &state.config.jwt, token, state.clock.now())
            .await
            .map_err(|e| {
                tracing::debug!("Failed to get user from token: {:?}", e);
                match e {
                    AppError::Database(_) => e,
                    _ => AppError::Unauthorized,
                }
            })?;

        Ok(AuthUser(user))
    }
}

/// Like [`AuthUser`] but anonymous or bad credentials give `None`.
/// Database failures still reject, so a signed-in user is never silently
/// treated as anonymous.
pub struct MaybeAuthUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match AuthUser::from_request_parts(parts, state).await {
            Ok(AuthUser(user)) => Ok(MaybeAuthUser(Some(user))),
            Err(AppError::Database(e)) => {
                tracing::warn!("Could not resolve caller, database error: {}", e);
                Err(AppError::Database(e))
            }
            Err(_) => Ok(MaybeAuthUser(None)),
        }
    }
}

/// Staff or superuser.
pub struct StaffUser(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for StaffUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_staff_member() {
            tracing::warn!("User {} denied staff access", user.id);
            return Err(AppError::Forbidden);
        }
        Ok(StaffUser(user))
    }
}

pub struct SuperUser(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for SuperUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            tracing::warn!("User {} denied superuser access", user.id);
            return Err(AppError::Forbidden);
        }
        Ok(SuperUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{bearer, send, test_state};
    use axum::http::StatusCode;
    use serde_json::json;

    fn app(state: Arc<AppState>) -> Router {
        Router::new().nest("/api/auth", router()).with_state(state)
    }

    #[tokio::test]
    async fn signup_then_me() {
        let state = test_state().await;

        let (status, body) = send(
            app(state.clone()),
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({ "username": "asha", "password": "password123", "email": "asha@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["user"].get("password_hash").is_none());

        let token = format!("Bearer {}", body["token"].as_str().unwrap());
        let (status, me) = send(app(state.clone()), "GET", "/api/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["username"], "asha");

        let (status, _) = send(
            app(state),
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({ "username": "asha", "password": "password123" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn login_failures() {
        let state = test_state().await;
        let user = crate::testing::seed_user(&state.db, "ravi").await;

        let (status, body) = send(
            app(state.clone()),
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "ravi", "password": "nope-nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");

        UserRepository::set_active(&state.db, &user.id, false).await.unwrap();
        let (status, _) = send(
            app(state),
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "ravi", "password": "password123" })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn me_requires_a_valid_token() {
        let state = test_state().await;
        let user = crate::testing::seed_user(&state.db, "kiran").await;

        let (status, _) = send(app(state.clone()), "GET", "/api/auth/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            app(state.clone()),
            "GET",
            "/api/auth/me",
            Some("Bearer garbage"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let token = bearer(&state, &user);
        let (status, body) = send(
            app(state),
            "PUT",
            "/api/auth/me",
            Some(&token),
            Some(json!({ "phone_number": "9876543210" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phone_number"], "9876543210");
        assert_eq!(body["email"], "kiran@example.com");
    }
}
