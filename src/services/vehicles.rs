use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::db::{
    CreateExpenseLog, CreateMaintenanceLog, CreateVehicle, ExpenseLog, ExpenseLogRepository,
    ExpenseType, FuelLogRepository, FuelType, MaintenanceLog, MaintenanceLogRepository,
    ServiceType, TripLogRepository, UpdateVehicleDocuments, User, Vehicle, VehicleCategory,
    VehicleRepository,
};
use crate::error::{AppError, AppResult};
use crate::services::metrics::VehicleStats;

fn default_ownership() -> String {
    "1st Owner".to_string()
}

fn default_purchase_year() -> i32 {
    2023
}

fn default_purchase_price() -> f64 {
    500_000.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewVehicleRequest {
    #[serde(default)]
    pub category: VehicleCategory,
    pub make: String,
    pub model_name: String,
    pub license_plate: String,
    #[serde(default)]
    pub fuel_type: FuelType,
    #[serde(default = "default_ownership")]
    pub ownership_type: String,
    #[serde(default = "default_purchase_year")]
    pub purchase_year: i32,
    #[serde(default = "default_purchase_price")]
    pub purchase_price: f64,
    #[serde(default)]
    pub current_odometer: f64,
    pub insurance_expiry: Option<NaiveDate>,
    pub pollution_expiry: Option<NaiveDate>,
    pub fitness_expiry: Option<NaiveDate>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaintenanceInput {
    pub service_type: ServiceType,
    /// Defaults to today.
    pub date: Option<NaiveDate>,
    pub odometer_reading: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseInput {
    pub vehicle_id: String,
    pub date: NaiveDate,
    pub expense_type: ExpenseType,
    pub amount: f64,
    pub notes: Option<String>,
}

fn required(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub struct VehicleService;

impl VehicleService {
    pub async fn create(
        pool: &SqlitePool,
        owner: &User,
        request: NewVehicleRequest,
        now: NaiveDateTime,
    ) -> AppResult<Vehicle> {
        let make = required("Make", &request.make)?;
        let model_name = required("Model name", &request.model_name)?;
        let license_plate = required("License plate", &request.license_plate)?.to_uppercase();

        let latest_year = now.date().year() + 1;
        if !(1900..=latest_year).contains(&request.purchase_year) {
            return Err(AppError::Validation(format!(
                "Purchase year must be between 1900 and {}",
                latest_year
            )));
        }
        if request.purchase_price < 0.0 || request.current_odometer < 0.0 {
            return Err(AppError::Validation(
                "Purchase price and odometer cannot be negative".to_string(),
            ));
        }

        let vehicle = VehicleRepository::create(
            pool,
            CreateVehicle {
                owner_id: owner.id.clone(),
                category: request.category,
                make,
                model_name,
                license_plate,
                fuel_type: request.fuel_type,
                ownership_type: required("Ownership type", &request.ownership_type)?,
                purchase_year: request.purchase_year,
                purchase_price: request.purchase_price,
                current_odometer: request.current_odometer,
                insurance_expiry: request.insurance_expiry,
                pollution_expiry: request.pollution_expiry,
                fitness_expiry: request.fitness_expiry,
                image_url: non_blank(request.image_url),
            },
            now,
        )
        .await?;

        tracing::info!("User {} registered vehicle {}", owner.id, vehicle);
        Ok(vehicle)
    }

    pub async fn get(pool: &SqlitePool, owner: &User, id: &str) -> AppResult<Vehicle> {
        VehicleRepository::find_owned_active(pool, id, &owner.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))
    }

    pub async fn remove(pool: &SqlitePool, owner: &User, id: &str, now: NaiveDateTime) -> AppResult<()> {
        if !VehicleRepository::deactivate(pool, id, &owner.id, now).await? {
            return Err(AppError::NotFound("Vehicle not found".to_string()));
        }
        tracing::info!("User {} removed vehicle {}", owner.id, id);
        Ok(())
    }

    pub async fn update_documents(
        pool: &SqlitePool,
        owner: &User,
        id: &str,
        docs: UpdateVehicleDocuments,
        now: NaiveDateTime,
    ) -> AppResult<Vehicle> {
        VehicleRepository::update_documents(pool, id, &owner.id, docs, now)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))
    }

    pub async fn update_targets(
        pool: &SqlitePool,
        owner: &User,
        id: &str,
        target_mileage: f64,
        target_cost_per_km: f64,
        now: NaiveDateTime,
    ) -> AppResult<Vehicle> {
        if target_mileage < 0.0 || target_cost_per_km < 0.0 {
            return Err(AppError::Validation("Targets cannot be negative".to_string()));
        }

        VehicleRepository::update_targets(pool, id, &owner.id, target_mileage, target_cost_per_km, now)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))
    }

    pub async fn stats(pool: &SqlitePool, owner: &User, id: &str) -> AppResult<VehicleStats> {
        let vehicle = Self::get(pool, owner, id).await?;

        let fuel_logs = FuelLogRepository::list_for_vehicle(pool, id).await?;
        let trips = TripLogRepository::list_for_vehicle(pool, id).await?;
        let expenses = ExpenseLogRepository::list_for_vehicle(pool, id).await?;
        let maintenance = MaintenanceLogRepository::list_for_vehicle(pool, id).await?;

        Ok(VehicleStats::compute(
            &vehicle,
            &fuel_logs,
            &trips,
            &expenses,
            &maintenance,
        ))
    }

    pub async fn log_maintenance(
        pool: &SqlitePool,
        owner: &User,
        vehicle_id: &str,
        input: MaintenanceInput,
        today: NaiveDate,
    ) -> AppResult<MaintenanceLog> {
        if input.odometer_reading < 0 {
            return Err(AppError::Validation(
                "Odometer reading cannot be negative".to_string(),
            ));
        }
        Self::get(pool, owner, vehicle_id).await?;

        let log = MaintenanceLogRepository::create(
            pool,
            CreateMaintenanceLog {
                vehicle_id: vehicle_id.to_string(),
                service_type: input.service_type,
                date: input.date.unwrap_or(today),
                odometer_reading: input.odometer_reading,
                notes: non_blank(input.notes),
            },
        )
        .await?;

        tracing::info!(
            "Logged {} for vehicle {}",
            input.service_type.display_name(),
            vehicle_id
        );
        Ok(log)
    }

    pub async fn log_expense(
        pool: &SqlitePool,
        owner: &User,
        input: ExpenseInput,
        now: NaiveDateTime,
    ) -> AppResult<ExpenseLog> {
        if input.amount <= 0.0 {
            return Err(AppError::Validation(
                "Amount must be greater than zero".to_string(),
            ));
        }
        Self::get(pool, owner, &input.vehicle_id).await?;
        tracing::debug!(
            "User {} logging {} of {:.2}",
            owner.id,
            input.expense_type.display_name(),
            input.amount
        );

        ExpenseLogRepository::create(
            pool,
            CreateExpenseLog {
                vehicle_id: input.vehicle_id,
                user_id: owner.id.clone(),
                date: input.date,
                expense_type: input.expense_type,
                amount: input.amount,
                notes: non_blank(input.notes),
            },
            now,
        )
        .await
    }
}
