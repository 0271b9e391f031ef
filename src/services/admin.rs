//! Admin panel operations: dashboard counters, catalog curation and account
//! moderation. Callers enforce the staff/superuser split; this module only
//! guards superuser accounts from moderation.

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::{CreateNewCar, NewCar, NewCarRepository, User, UserRepository};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_db_cars: i64,
    pub suspended_users: i64,
}

pub struct AdminService;

impl AdminService {
    pub async fn dashboard(pool: &SqlitePool) -> AppResult<DashboardStats> {
        Ok(DashboardStats {
            total_users: UserRepository::count_non_superusers(pool).await?,
            total_db_cars: NewCarRepository::count(pool).await?,
            suspended_users: UserRepository::count_suspended(pool).await?,
        })
    }

    pub async fn add_car(pool: &SqlitePool, car: CreateNewCar, now: NaiveDateTime) -> AppResult<NewCar> {
        if car.make.trim().is_empty() || car.model.trim().is_empty() {
            return Err(AppError::Validation("Make and model are required".to_string()));
        }
        if car.price_lakhs <= 0.0 {
            return Err(AppError::Validation(
                "Price must be greater than zero".to_string(),
            ));
        }

        let car = NewCarRepository::create(
            pool,
            CreateNewCar {
                make: car.make.trim().to_string(),
                model: car.model.trim().to_string(),
                ..car
            },
            now,
        )
        .await?;
        tracing::info!("Catalog entry added: {} {}", car.make, car.model);
        Ok(car)
    }

    /// Flip catalog visibility. Returns the entry and a status line.
    pub async fn toggle_car(pool: &SqlitePool, id: &str) -> AppResult<(NewCar, String)> {
        let car = NewCarRepository::toggle_active(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Catalog entry not found".to_string()))?;

        let status = if car.is_active { "Live" } else { "Hidden" };
        let message = format!("{} {} is now {}", car.make, car.model, status);
        tracing::info!("{}", message);
        Ok((car, message))
    }

    pub async fn delete_car(pool: &SqlitePool, id: &str) -> AppResult<String> {
        let car = NewCarRepository::delete(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Catalog entry not found".to_string()))?;

        let message = format!("{} {} deleted from catalog.", car.make, car.model);
        tracing::info!("{}", message);
        Ok(message)
    }

    async fn moderatable_user(pool: &SqlitePool, id: &str) -> AppResult<User> {
        let user = UserRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if user.is_superuser {
            tracing::warn!("Refusing to moderate superuser {}", user.id);
            return Err(AppError::Forbidden);
        }
        Ok(user)
    }

    /// Suspend an active account or reactivate a suspended one.
    pub async fn toggle_user(pool: &SqlitePool, id: &str) -> AppResult<(User, String)> {
        let user = Self::moderatable_user(pool, id).await?;
        let user = UserRepository::set_active(pool, &user.id, !user.is_active).await?;

        let status = if user.is_active { "reactivated" } else { "suspended" };
        let message = format!("User {} has been {}.", user.username, status);
        tracing::info!("{}", message);
        Ok((user, message))
    }

    pub async fn delete_user(pool: &SqlitePool, id: &str) -> AppResult<String> {
        let user = Self::moderatable_user(pool, id).await?;
        UserRepository::delete(pool, &user.id).await?;

        let message = format!("User {} has been removed from the system.", user.username);
        tracing::info!("{}", message);
        Ok(message)
    }
}
