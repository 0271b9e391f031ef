use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::{TripInput, TripLog, TripLogRepository, User, VehicleRepository};
use crate::error::{AppError, AppResult};
use crate::services::metrics::trip_distance;

/// A persisted trip and whether it pushed the vehicle's odometer forward.
#[derive(Debug, Clone, Serialize)]
pub struct SavedTrip {
    pub trip: TripLog,
    pub odometer_updated: bool,
}

pub struct TripService;

impl TripService {
    fn validate(input: &TripInput) -> AppResult<()> {
        if input.start_odometer < 0.0 {
            return Err(AppError::Validation(
                "Start odometer cannot be negative".to_string(),
            ));
        }
        if input.end_odometer < input.start_odometer {
            return Err(AppError::Validation(
                "End odometer cannot be lower than start odometer".to_string(),
            ));
        }
        Ok(())
    }

    /// Record a trip. The insert and the odometer sync share one transaction,
    /// and the odometer only moves when the trip ends beyond it.
    ///
    /// The transaction opens with the INSERT, so it holds the write lock from
    /// its first statement and concurrent saves wait on the busy timeout
    /// instead of failing a read-to-write upgrade.
    pub async fn create(
        pool: &SqlitePool,
        driver: &User,
        input: TripInput,
        now: NaiveDateTime,
    ) -> AppResult<SavedTrip> {
        Self::validate(&input)?;

        let distance = trip_distance(input.start_odometer, input.end_odometer);
        let mut tx = pool.begin().await?;

        let trip = TripLogRepository::insert(&mut *tx, &driver.id, &input, distance, now)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;
        let odometer_updated =
            VehicleRepository::advance_odometer(&mut *tx, &input.vehicle_id, input.end_odometer, now)
                .await?;

        tx.commit().await?;

        tracing::debug!(
            "Trip {} saved ({} km), odometer updated: {}",
            trip.id,
            distance,
            odometer_updated
        );
        Ok(SavedTrip {
            trip,
            odometer_updated,
        })
    }

    /// Edit an existing trip. Distance is recomputed and the odometer rule
    /// applies again to the new end reading.
    pub async fn update(
        pool: &SqlitePool,
        owner: &User,
        trip_id: &str,
        input: TripInput,
        now: NaiveDateTime,
    ) -> AppResult<SavedTrip> {
        Self::validate(&input)?;

        let distance = trip_distance(input.start_odometer, input.end_odometer);
        let mut tx = pool.begin().await?;

        let Some(trip) =
            TripLogRepository::update(&mut *tx, trip_id, &owner.id, &input, distance).await?
        else {
            tx.rollback().await?;
            return Err(match TripLogRepository::find_owned(pool, trip_id, &owner.id).await? {
                Some(_) => AppError::NotFound("Vehicle not found".to_string()),
                None => AppError::NotFound("Trip not found".to_string()),
            });
        };
        let odometer_updated =
            VehicleRepository::advance_odometer(&mut *tx, &input.vehicle_id, input.end_odometer, now)
                .await?;

        tx.commit().await?;

        Ok(SavedTrip {
            trip,
            odometer_updated,
        })
    }
}
