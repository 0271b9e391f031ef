use chrono::NaiveDateTime;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::db::{CreateFuelLog, FuelLog, FuelLogRepository, User, VehicleRepository};
use crate::error::{AppError, AppResult};
use crate::services::metrics::fuel_efficiency;

#[derive(Debug, Clone, Deserialize)]
pub struct FuelFillInput {
    pub odometer_reading: i64,
    pub liters_filled: f64,
    pub total_cost: f64,
    /// Defaults to the current time.
    pub date: Option<NaiveDateTime>,
}

impl FuelFillInput {
    fn validate(&self) -> AppResult<()> {
        if self.odometer_reading < 0 {
            return Err(AppError::Validation(
                "Odometer reading cannot be negative".to_string(),
            ));
        }
        if self.liters_filled <= 0.0 {
            return Err(AppError::Validation(
                "Liters filled must be greater than zero".to_string(),
            ));
        }
        if self.total_cost < 0.0 {
            return Err(AppError::Validation("Total cost cannot be negative".to_string()));
        }
        Ok(())
    }
}

pub struct FuelService;

impl FuelService {
    /// Store a fill-up with its efficiency against the previous fill.
    pub async fn log_fill(
        pool: &SqlitePool,
        driver: &User,
        vehicle_id: &str,
        input: FuelFillInput,
        now: NaiveDateTime,
    ) -> AppResult<FuelLog> {
        input.validate()?;

        VehicleRepository::find_owned_active(pool, vehicle_id, &driver.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        let previous = FuelLogRepository::previous_fill(pool, vehicle_id, input.odometer_reading).await?;
        let efficiency = fuel_efficiency(
            previous.map(|p| p.odometer_reading),
            input.odometer_reading,
            input.liters_filled,
            input.total_cost,
        );

        FuelLogRepository::create(
            pool,
            CreateFuelLog {
                vehicle_id: vehicle_id.to_string(),
                driver_id: driver.id.clone(),
                date: input.date.unwrap_or(now),
                odometer_reading: input.odometer_reading,
                liters_filled: input.liters_filled,
                total_cost: input.total_cost,
                calculated_km_per_liter: efficiency.km_per_liter,
                calculated_cost_per_km: efficiency.cost_per_km,
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, seed_user, seed_vehicle, test_now, test_pool};

    fn fill(odometer: i64, liters: f64, cost: f64) -> FuelFillInput {
        FuelFillInput {
            odometer_reading: odometer,
            liters_filled: liters,
            total_cost: cost,
            date: None,
        }
    }

    #[tokio::test]
    async fn second_fill_gets_efficiency() {
        let pool = test_pool().await;
        let driver = seed_user(&pool, "driver").await;
        let car = seed_vehicle(&pool, &driver.id, "Swift").await;

        let first = FuelService::log_fill(&pool, &driver, &car.id, fill(1000, 30.0, 3000.0), test_now())
            .await
            .unwrap();
        assert_eq!(first.calculated_km_per_liter, None);
        assert_eq!(first.date, test_now());

        let mut second = fill(1600, 40.0, 4200.0);
        second.date = Some(at(2026, 10, 20));
        let second = FuelService::log_fill(&pool, &driver, &car.id, second, test_now())
            .await
            .unwrap();
        assert_eq!(second.calculated_km_per_liter, Some(15.0));
        assert_eq!(second.calculated_cost_per_km, Some(7.0));
        assert_eq!(second.date, at(2026, 10, 20));
    }

    #[tokio::test]
    async fn rejects_bad_input_and_foreign_vehicles() {
        let pool = test_pool().await;
        let driver = seed_user(&pool, "driver").await;
        let stranger = seed_user(&pool, "stranger").await;
        let car = seed_vehicle(&pool, &driver.id, "Swift").await;

        let err = FuelService::log_fill(&pool, &driver, &car.id, fill(1000, 0.0, 100.0), test_now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = FuelService::log_fill(&pool, &stranger, &car.id, fill(1000, 10.0, 100.0), test_now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
