use chrono::NaiveDateTime;
use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

use crate::db::models::*;
use crate::error::{AppError, AppResult};

// ============================================================================
// Vehicle Repository
// ============================================================================

pub struct VehicleRepository;

impl VehicleRepository {
    pub async fn create(
        pool: &SqlitePool,
        vehicle: CreateVehicle,
        now: NaiveDateTime,
    ) -> AppResult<Vehicle> {
        let id = Uuid::new_v4().to_string();

        sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                id, owner_id, category, make, model_name, license_plate,
                fuel_type, ownership_type, purchase_year, purchase_price,
                current_odometer, insurance_expiry, pollution_expiry, fitness_expiry,
                image_url, is_active, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&vehicle.owner_id)
        .bind(vehicle.category.as_str())
        .bind(&vehicle.make)
        .bind(&vehicle.model_name)
        .bind(&vehicle.license_plate)
        .bind(vehicle.fuel_type.as_str())
        .bind(&vehicle.ownership_type)
        .bind(vehicle.purchase_year)
        .bind(vehicle.purchase_price)
        .bind(vehicle.current_odometer)
        .bind(vehicle.insurance_expiry)
        .bind(vehicle.pollution_expiry)
        .bind(vehicle.fitness_expiry)
        .bind(&vehicle.image_url)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    /// Active vehicles of one owner in the order they were registered.
    pub async fn find_active_by_owner(pool: &SqlitePool, owner_id: &str) -> AppResult<Vec<Vehicle>> {
        sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT * FROM vehicles
            WHERE owner_id = ? AND is_active = 1
            ORDER BY created_at ASC, rowid ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    /// An active vehicle, but only if it belongs to `owner_id`.
    pub async fn find_owned_active<'e, E>(
        executor: E,
        id: &str,
        owner_id: &str,
    ) -> AppResult<Option<Vehicle>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE id = ? AND owner_id = ? AND is_active = 1",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::Database)
    }

    /// Soft delete: the vehicle disappears from lists and reminders, its logs stay.
    pub async fn deactivate(
        pool: &SqlitePool,
        id: &str,
        owner_id: &str,
        now: NaiveDateTime,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE vehicles SET is_active = 0, updated_at = ?
            WHERE id = ? AND owner_id = ? AND is_active = 1
            "#,
        )
        .bind(now)
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await
        .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn update_documents(
        pool: &SqlitePool,
        id: &str,
        owner_id: &str,
        docs: UpdateVehicleDocuments,
        now: NaiveDateTime,
    ) -> AppResult<Option<Vehicle>> {
        sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET insurance_expiry = ?, pollution_expiry = ?, fitness_expiry = ?, updated_at = ?
            WHERE id = ? AND owner_id = ? AND is_active = 1
            RETURNING *
            "#,
        )
        .bind(docs.insurance_expiry)
        .bind(docs.pollution_expiry)
        .bind(docs.fitness_expiry)
        .bind(now)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn update_targets(
        pool: &SqlitePool,
        id: &str,
        owner_id: &str,
        target_mileage: f64,
        target_cost_per_km: f64,
        now: NaiveDateTime,
    ) -> AppResult<Option<Vehicle>> {
        sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET target_mileage = ?, target_cost_per_km = ?, updated_at = ?
            WHERE id = ? AND owner_id = ? AND is_active = 1
            RETURNING *
            "#,
        )
        .bind(target_mileage)
        .bind(target_cost_per_km)
        .bind(now)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    /// Move the odometer forward to `reading` when it is higher than the stored
    /// value. The comparison happens inside the UPDATE so concurrent writers
    /// cannot move the odometer backwards. Returns whether a row changed.
    pub async fn advance_odometer<'e, E>(
        executor: E,
        id: &str,
        reading: f64,
        now: NaiveDateTime,
    ) -> AppResult<bool>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            r#"
            UPDATE vehicles SET current_odometer = ?, updated_at = ?
            WHERE id = ? AND current_odometer < ?
            "#,
        )
        .bind(reading)
        .bind(now)
        .bind(id)
        .bind(reading)
        .execute(executor)
        .await
        .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
