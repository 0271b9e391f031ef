use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::choices::CarType;

/// Admin-curated market launch shown in car recommendations.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct NewCar {
    pub id: String,
    pub make: String,
    pub model: String,
    pub car_type: String,
    pub price_lakhs: f64,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub launched_at: NaiveDateTime,
    /// Visibility toggle for the recommendation surface
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNewCar {
    pub make: String,
    pub model: String,
    pub car_type: CarType,
    pub price_lakhs: f64,
    pub image_url: Option<String>,
    pub description: Option<String>,
}
