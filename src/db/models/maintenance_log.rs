use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::choices::ServiceType;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MaintenanceLog {
    pub id: String,
    pub vehicle_id: String,
    pub service_type: String,
    pub date: NaiveDate,
    /// Odometer reading when the service was done
    pub odometer_reading: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateMaintenanceLog {
    pub vehicle_id: String,
    pub service_type: ServiceType,
    pub date: NaiveDate,
    pub odometer_reading: i64,
    pub notes: Option<String>,
}
