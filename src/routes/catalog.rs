use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::db::{CarType, NewCar, NewCarRepository};
use crate::error::{AppError, AppResult};
use crate::routes::auth::AuthUser;
use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_catalog))
}

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub max_price_lakhs: Option<f64>,
    pub car_type: Option<String>,
}

/// Visible launches for the recommendation surface, newest first.
async fn list_catalog(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<Vec<NewCar>>> {
    let car_type = query
        .car_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(|t| CarType::try_from(t).map_err(AppError::BadRequest))
        .transpose()?;

    let cars = NewCarRepository::list_visible(&state.db, query.max_price_lakhs, car_type).await?;
    Ok(Json(cars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::CreateNewCar;
    use crate::testing::{bearer, seed_user, send, test_now, test_state};
    use axum::http::StatusCode;

    fn app(state: Arc<AppState>) -> Router {
        Router::new().nest("/api/catalog", router()).with_state(state)
    }

    #[tokio::test]
    async fn filters_and_rejects_unknown_types() {
        let state = test_state().await;
        let user = seed_user(&state.db, "buyer").await;
        for (model, car_type, price) in [("Curvv EV", CarType::Ev, 17.5), ("Altroz", CarType::Hatchback, 6.6)] {
            NewCarRepository::create(
                &state.db,
                CreateNewCar {
                    make: "Tata".to_string(),
                    model: model.to_string(),
                    car_type,
                    price_lakhs: price,
                    image_url: None,
                    description: None,
                },
                test_now(),
            )
            .await
            .unwrap();
        }
        let token = bearer(&state, &user);

        let (status, body) = send(
            app(state.clone()),
            "GET",
            "/api/catalog?max_price_lakhs=10",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["model"], "Altroz");

        let (_, body) = send(app(state.clone()), "GET", "/api/catalog?car_type=EV", Some(&token), None).await;
        assert_eq!(body[0]["model"], "Curvv EV");

        let (status, _) = send(app(state), "GET", "/api/catalog?car_type=Truck", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
