use chrono::NaiveDateTime;
use sqlx::{Sqlite, SqlitePool};
use uuid::Uuid;

use crate::db::models::*;
use crate::error::{AppError, AppResult};

// ============================================================================
// Trip Log Repository
// ============================================================================

pub struct TripLogRepository;

impl TripLogRepository {
    /// Insert a trip, but only onto an active vehicle owned by `driver_id`.
    /// The ownership check is part of the INSERT so that a transaction
    /// opening with it takes the write lock straight away.
    pub async fn insert<'e, E>(
        executor: E,
        driver_id: &str,
        trip: &TripInput,
        distance_km: f64,
        now: NaiveDateTime,
    ) -> AppResult<Option<TripLog>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let id = Uuid::new_v4().to_string();

        sqlx::query_as::<_, TripLog>(
            r#"
            INSERT INTO trip_logs (
                id, vehicle_id, driver_id, date, start_odometer, end_odometer,
                distance_km, purpose, notes, created_at
            )
            SELECT ?, v.id, ?, ?, ?, ?, ?, ?, ?, ?
            FROM vehicles v
            WHERE v.id = ? AND v.owner_id = ? AND v.is_active = 1
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(driver_id)
        .bind(trip.date)
        .bind(trip.start_odometer)
        .bind(trip.end_odometer)
        .bind(distance_km)
        .bind(trip.purpose.as_str())
        .bind(&trip.notes)
        .bind(now)
        .bind(&trip.vehicle_id)
        .bind(driver_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::Database)
    }

    /// Rewrite a trip owned by `owner_id`. Both the trip's current vehicle and
    /// the target vehicle must belong to the owner, and the target must be active.
    pub async fn update<'e, E>(
        executor: E,
        id: &str,
        owner_id: &str,
        trip: &TripInput,
        distance_km: f64,
    ) -> AppResult<Option<TripLog>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, TripLog>(
            r#"
            UPDATE trip_logs
            SET vehicle_id = ?, date = ?, start_odometer = ?, end_odometer = ?,
                distance_km = ?, purpose = ?, notes = ?
            WHERE id = ?
              AND vehicle_id IN (SELECT id FROM vehicles WHERE owner_id = ?)
              AND EXISTS (
                  SELECT 1 FROM vehicles
                  WHERE id = ? AND owner_id = ? AND is_active = 1
              )
            RETURNING *
            "#,
        )
        .bind(&trip.vehicle_id)
        .bind(trip.date)
        .bind(trip.start_odometer)
        .bind(trip.end_odometer)
        .bind(distance_km)
        .bind(trip.purpose.as_str())
        .bind(&trip.notes)
        .bind(id)
        .bind(owner_id)
        .bind(&trip.vehicle_id)
        .bind(owner_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::Database)
    }

    pub async fn find_owned<'e, E>(executor: E, id: &str, owner_id: &str) -> AppResult<Option<TripLog>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, TripLog>(
            r#"
            SELECT t.* FROM trip_logs t
            JOIN vehicles v ON v.id = t.vehicle_id
            WHERE t.id = ? AND v.owner_id = ?
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::Database)
    }

    /// Most recent trip by calendar date.
    pub async fn latest_for_vehicle(
        pool: &SqlitePool,
        vehicle_id: &str,
    ) -> AppResult<Option<TripLog>> {
        sqlx::query_as::<_, TripLog>(
            r#"
            SELECT * FROM trip_logs WHERE vehicle_id = ?
            ORDER BY date DESC, created_at DESC
            LIMIT 1
            "#,
        )
        .bind(vehicle_id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn list_for_vehicle(pool: &SqlitePool, vehicle_id: &str) -> AppResult<Vec<TripLog>> {
        sqlx::query_as::<_, TripLog>(
            "SELECT * FROM trip_logs WHERE vehicle_id = ? ORDER BY date DESC, created_at DESC",
        )
        .bind(vehicle_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn list_for_owner(pool: &SqlitePool, owner_id: &str) -> AppResult<Vec<TripLog>> {
        sqlx::query_as::<_, TripLog>(
            r#"
            SELECT t.* FROM trip_logs t
            JOIN vehicles v ON v.id = t.vehicle_id
            WHERE v.owner_id = ?
            ORDER BY t.date DESC, t.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn delete_owned(pool: &SqlitePool, id: &str, owner_id: &str) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM trip_logs
            WHERE id = ? AND vehicle_id IN (SELECT id FROM vehicles WHERE owner_id = ?)
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await
        .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
