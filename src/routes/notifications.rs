use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::error::AppResult;
use crate::routes::auth::MaybeAuthUser;
use crate::services::alerts::{AlertService, NotificationSummary};
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get_notifications))
}

/// Reminder bell. Anonymous callers get an empty summary rather than a 401.
async fn get_notifications(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(user): MaybeAuthUser,
) -> AppResult<Json<NotificationSummary>> {
    let summary = AlertService::for_user(
        &state.db,
        user.as_ref(),
        state.clock.today(),
        &state.config.alerts,
    )
    .await?;
    Ok(Json(summary))
}
