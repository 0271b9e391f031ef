use chrono::NaiveDateTime;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::*;
use crate::error::{AppError, AppResult};

// ============================================================================
// User Repository
// ============================================================================

pub struct UserRepository;

impl UserRepository {
    pub async fn create(pool: &SqlitePool, user: CreateUser, now: NaiveDateTime) -> AppResult<User> {
        let id = Uuid::new_v4().to_string();

        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                id, username, email, password_hash, phone_number,
                is_manager, is_staff, is_superuser, is_active, date_joined
            )
            VALUES (?, ?, ?, ?, ?, 0, ?, ?, 1, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone_number)
        .bind(user.is_staff)
        .bind(user.is_superuser)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict(format!("Username '{}' is already taken", user.username))
            }
            other => AppError::Database(other),
        })
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(AppError::Database)
    }

    pub async fn find_by_username(pool: &SqlitePool, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await
            .map_err(AppError::Database)
    }

    pub async fn update_profile(
        pool: &SqlitePool,
        id: &str,
        update: UpdateProfile,
    ) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = COALESCE(?, email),
                phone_number = COALESCE(?, phone_number)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(update.email)
        .bind(update.phone_number)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn touch_last_login(pool: &SqlitePool, id: &str, now: NaiveDateTime) -> AppResult<()> {
        sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(now)
            .bind(id)
            .execute(pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    /// All non-superuser accounts, newest first.
    pub async fn list_non_superusers(pool: &SqlitePool) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE is_superuser = 0 ORDER BY date_joined DESC, id DESC",
        )
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn count_non_superusers(pool: &SqlitePool) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE is_superuser = 0")
            .fetch_one(pool)
            .await
            .map_err(AppError::Database)
    }

    pub async fn count_suspended(pool: &SqlitePool) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE is_active = 0 AND is_superuser = 0",
        )
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn set_active(pool: &SqlitePool, id: &str, is_active: bool) -> AppResult<User> {
        sqlx::query_as::<_, User>("UPDATE users SET is_active = ? WHERE id = ? RETURNING *")
            .bind(is_active)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Delete a user; vehicles and logs go with it through ON DELETE CASCADE.
    pub async fn delete(pool: &SqlitePool, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }

    /// Make sure a superuser with this username exists. An existing account is
    /// promoted and reactivated; its password is replaced.
    pub async fn ensure_superuser(
        pool: &SqlitePool,
        username: &str,
        password_hash: &str,
        now: NaiveDateTime,
    ) -> AppResult<User> {
        let id = Uuid::new_v4().to_string();

        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                id, username, email, password_hash, phone_number,
                is_manager, is_staff, is_superuser, is_active, date_joined
            )
            VALUES (?, ?, '', ?, '', 0, 1, 1, 1, ?)
            ON CONFLICT(username) DO UPDATE SET
                password_hash = excluded.password_hash,
                is_staff = 1,
                is_superuser = 1,
                is_active = 1
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(username)
        .bind(password_hash)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }
}
