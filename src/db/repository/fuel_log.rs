use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::*;
use crate::error::{AppError, AppResult};

// ============================================================================
// Fuel Log Repository
// ============================================================================

pub struct FuelLogRepository;

impl FuelLogRepository {
    pub async fn create(pool: &SqlitePool, log: CreateFuelLog) -> AppResult<FuelLog> {
        let id = Uuid::new_v4().to_string();

        sqlx::query_as::<_, FuelLog>(
            r#"
            INSERT INTO fuel_logs (
                id, vehicle_id, driver_id, date, odometer_reading, liters_filled,
                total_cost, calculated_km_per_liter, calculated_cost_per_km
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&log.vehicle_id)
        .bind(&log.driver_id)
        .bind(log.date)
        .bind(log.odometer_reading)
        .bind(log.liters_filled)
        .bind(log.total_cost)
        .bind(log.calculated_km_per_liter)
        .bind(log.calculated_cost_per_km)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    /// Most recent fill by timestamp.
    pub async fn latest_for_vehicle(
        pool: &SqlitePool,
        vehicle_id: &str,
    ) -> AppResult<Option<FuelLog>> {
        sqlx::query_as::<_, FuelLog>(
            "SELECT * FROM fuel_logs WHERE vehicle_id = ? ORDER BY date DESC, rowid DESC LIMIT 1",
        )
        .bind(vehicle_id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    /// The fill that precedes a reading: highest odometer strictly below it.
    pub async fn previous_fill(
        pool: &SqlitePool,
        vehicle_id: &str,
        odometer_reading: i64,
    ) -> AppResult<Option<FuelLog>> {
        sqlx::query_as::<_, FuelLog>(
            r#"
            SELECT * FROM fuel_logs
            WHERE vehicle_id = ? AND odometer_reading < ?
            ORDER BY odometer_reading DESC, date DESC
            LIMIT 1
            "#,
        )
        .bind(vehicle_id)
        .bind(odometer_reading)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn list_for_vehicle(pool: &SqlitePool, vehicle_id: &str) -> AppResult<Vec<FuelLog>> {
        sqlx::query_as::<_, FuelLog>(
            "SELECT * FROM fuel_logs WHERE vehicle_id = ? ORDER BY date DESC, rowid DESC",
        )
        .bind(vehicle_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    /// Every fill on any vehicle the user owns, newest first.
    pub async fn list_for_owner(pool: &SqlitePool, owner_id: &str) -> AppResult<Vec<FuelLog>> {
        sqlx::query_as::<_, FuelLog>(
            r#"
            SELECT f.* FROM fuel_logs f
            JOIN vehicles v ON v.id = f.vehicle_id
            WHERE v.owner_id = ?
            ORDER BY f.date DESC, f.rowid DESC
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
            DELETE FROM fuel_logs
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, seed_user, seed_vehicle, test_pool};

    fn fill(vehicle: &Vehicle, day: u32, odometer: i64) -> CreateFuelLog {
        CreateFuelLog {
            vehicle_id: vehicle.id.clone(),
            driver_id: vehicle.owner_id.clone(),
            date: at(2026, 10, day),
            odometer_reading: odometer,
            liters_filled: 30.0,
            total_cost: 3000.0,
            calculated_km_per_liter: None,
            calculated_cost_per_km: None,
        }
    }

    #[tokio::test]
    async fn latest_is_by_timestamp_not_insert_order() {
        let pool = test_pool().await;
        let owner = seed_user(&pool, "owner").await;
        let car = seed_vehicle(&pool, &owner.id, "Swift").await;

        FuelLogRepository::create(&pool, fill(&car, 12, 1500)).await.unwrap();
        FuelLogRepository::create(&pool, fill(&car, 3, 1000)).await.unwrap();

        let latest = FuelLogRepository::latest_for_vehicle(&pool, &car.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.date, at(2026, 10, 12));
    }

    #[tokio::test]
    async fn previous_fill_is_strictly_below_reading() {
        let pool = test_pool().await;
        let owner = seed_user(&pool, "owner").await;
        let car = seed_vehicle(&pool, &owner.id, "Swift").await;

        FuelLogRepository::create(&pool, fill(&car, 1, 1000)).await.unwrap();
        FuelLogRepository::create(&pool, fill(&car, 5, 1400)).await.unwrap();

        let prev = FuelLogRepository::previous_fill(&pool, &car.id, 1400)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(prev.odometer_reading, 1000);
        assert!(FuelLogRepository::previous_fill(&pool, &car.id, 1000)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn delete_owned_refuses_other_users() {
        let pool = test_pool().await;
        let owner = seed_user(&pool, "owner").await;
        let intruder = seed_user(&pool, "intruder").await;
        let car = seed_vehicle(&pool, &owner.id, "Swift").await;
        let log = FuelLogRepository::create(&pool, fill(&car, 1, 1000)).await.unwrap();

        assert!(!FuelLogRepository::delete_owned(&pool, &log.id, &intruder.id)
            .await
            .unwrap());
        assert!(FuelLogRepository::delete_owned(&pool, &log.id, &owner.id)
            .await
            .unwrap());
        assert!(FuelLogRepository::list_for_owner(&pool, &owner.id)
            .await
            .unwrap()
            .is_empty());
    }
}
