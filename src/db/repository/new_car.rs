use chrono::NaiveDateTime;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::*;
use crate::error::{AppError, AppResult};

// ============================================================================
// New Car Catalog Repository
// ============================================================================

pub struct NewCarRepository;

impl NewCarRepository {
    pub async fn create(pool: &SqlitePool, car: CreateNewCar, now: NaiveDateTime) -> AppResult<NewCar> {
        let id = Uuid::new_v4().to_string();

        sqlx::query_as::<_, NewCar>(
            r#"
            INSERT INTO new_cars (
                id, make, model, car_type, price_lakhs, image_url, description, launched_at, is_active
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&car.make)
        .bind(&car.model)
        .bind(car.car_type.as_str())
        .bind(car.price_lakhs)
        .bind(&car.image_url)
        .bind(&car.description)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    /// Full catalog for the admin panel, newest launch first.
    pub async fn list_all(pool: &SqlitePool) -> AppResult<Vec<NewCar>> {
        sqlx::query_as::<_, NewCar>("SELECT * FROM new_cars ORDER BY launched_at DESC, rowid DESC")
            .fetch_all(pool)
            .await
            .map_err(AppError::Database)
    }

    /// Visible entries, optionally filtered by budget and body type.
    pub async fn list_visible(
        pool: &SqlitePool,
        max_price_lakhs: Option<f64>,
        car_type: Option<CarType>,
    ) -> AppResult<Vec<NewCar>> {
        let car_type = car_type.map(CarType::as_str);

        sqlx::query_as::<_, NewCar>(
            r#"
            SELECT * FROM new_cars
            WHERE is_active = 1
            AND (? IS NULL OR price_lakhs <= ?)
            AND (? IS NULL OR car_type = ?)
            ORDER BY launched_at DESC, rowid DESC
            "#,
        )
        .bind(max_price_lakhs)
        .bind(max_price_lakhs)
        .bind(car_type)
        .bind(car_type)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn count(pool: &SqlitePool) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM new_cars")
            .fetch_one(pool)
            .await
            .map_err(AppError::Database)
    }

    /// Flip visibility and return the updated entry.
    pub async fn toggle_active(pool: &SqlitePool, id: &str) -> AppResult<Option<NewCar>> {
        sqlx::query_as::<_, NewCar>(
            "UPDATE new_cars SET is_active = NOT is_active WHERE id = ? RETURNING *",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }

    /// Delete an entry, returning it so callers can report what was removed.
    pub async fn delete(pool: &SqlitePool, id: &str) -> AppResult<Option<NewCar>> {
        sqlx::query_as::<_, NewCar>("DELETE FROM new_cars WHERE id = ? RETURNING *")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(AppError::Database)
    }
}
