use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct FuelLog {
    pub id: String,
    pub vehicle_id: String,
    pub driver_id: String,
    pub date: NaiveDateTime,
    pub odometer_reading: i64,
    pub liters_filled: f64,
    pub total_cost: f64,
    pub calculated_km_per_liter: Option<f64>,
    pub calculated_cost_per_km: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct CreateFuelLog {
    pub vehicle_id: String,
    pub driver_id: String,
    pub date: NaiveDateTime,
    pub odometer_reading: i64,
    pub liters_filled: f64,
    pub total_cost: f64,
    pub calculated_km_per_liter: Option<f64>,
    pub calculated_cost_per_km: Option<f64>,
}
