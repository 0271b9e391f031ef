use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::*;
use crate::error::{AppError, AppResult};

// ============================================================================
// Maintenance Log Repository
// ============================================================================

pub struct MaintenanceLogRepository;

impl MaintenanceLogRepository {
    pub async fn create(pool: &SqlitePool, log: CreateMaintenanceLog) -> AppResult<MaintenanceLog> {
        let id = Uuid::new_v4().to_string();

        sqlx::query_as::<_, MaintenanceLog>(
            r#"
            INSERT INTO maintenance_logs (id, vehicle_id, service_type, date, odometer_reading, notes)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&log.vehicle_id)
        .bind(log.service_type.as_str())
        .bind(log.date)
        .bind(log.odometer_reading)
        .bind(&log.notes)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn list_for_vehicle(
        pool: &SqlitePool,
        vehicle_id: &str,
    ) -> AppResult<Vec<MaintenanceLog>> {
        sqlx::query_as::<_, MaintenanceLog>(
            "SELECT * FROM maintenance_logs WHERE vehicle_id = ? ORDER BY date DESC, rowid DESC",
        )
        .bind(vehicle_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn list_for_owner(pool: &SqlitePool, owner_id: &str) -> AppResult<Vec<MaintenanceLog>> {
        sqlx::query_as::<_, MaintenanceLog>(
            r#"
            SELECT m.* FROM maintenance_logs m
            JOIN vehicles v ON v.id = m.vehicle_id
            WHERE v.owner_id = ?
            ORDER BY m.date DESC, m.rowid DESC
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
            DELETE FROM maintenance_logs
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
