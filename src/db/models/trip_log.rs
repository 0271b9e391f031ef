use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::choices::TripPurpose;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TripLog {
    pub id: String,
    pub vehicle_id: String,
    pub driver_id: String,
    pub date: NaiveDate,
    pub start_odometer: f64,
    pub end_odometer: f64,
    /// Always `end_odometer - start_odometer`; never supplied by clients.
    pub distance_km: f64,
    pub purpose: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Trip fields as entered by the driver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripInput {
    pub vehicle_id: String,
    pub date: NaiveDate,
    pub start_odometer: f64,
    pub end_odometer: f64,
    #[serde(default)]
    pub purpose: TripPurpose,
    pub notes: Option<String>,
}
