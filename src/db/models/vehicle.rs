use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::choices::{FuelType, VehicleCategory};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub owner_id: String,

    pub category: String,
    pub make: String,
    pub model_name: String,
    pub license_plate: String,
    pub fuel_type: String,
    pub ownership_type: String,
    pub purchase_year: i32,
    pub purchase_price: f64,

    /// Target km/L (e.g. 18.5); 0 means unset
    pub target_mileage: f64,
    /// Target cost per km (e.g. 5.0); 0 means unset
    pub target_cost_per_km: f64,
    pub current_odometer: f64,

    // Document expiry dates
    pub insurance_expiry: Option<NaiveDate>,
    pub pollution_expiry: Option<NaiveDate>,
    pub fitness_expiry: Option<NaiveDate>,

    pub image_url: Option<String>,
    pub is_active: bool,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl std::fmt::Display for Vehicle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.make, self.model_name, self.license_plate)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVehicle {
    pub owner_id: String,
    pub category: VehicleCategory,
    pub make: String,
    pub model_name: String,
    pub license_plate: String,
    pub fuel_type: FuelType,
    pub ownership_type: String,
    pub purchase_year: i32,
    pub purchase_price: f64,
    pub current_odometer: f64,
    pub insurance_expiry: Option<NaiveDate>,
    pub pollution_expiry: Option<NaiveDate>,
    pub fitness_expiry: Option<NaiveDate>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateVehicleDocuments {
    pub insurance_expiry: Option<NaiveDate>,
    pub pollution_expiry: Option<NaiveDate>,
    pub fitness_expiry: Option<NaiveDate>,
}
