use chrono::NaiveDateTime;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::models::*;
use crate::error::{AppError, AppResult};

// ============================================================================
// Expense Log Repository
// ============================================================================

pub struct ExpenseLogRepository;

impl ExpenseLogRepository {
    pub async fn create(
        pool: &SqlitePool,
        log: CreateExpenseLog,
        now: NaiveDateTime,
    ) -> AppResult<ExpenseLog> {
        let id = Uuid::new_v4().to_string();

        sqlx::query_as::<_, ExpenseLog>(
            r#"
            INSERT INTO expense_logs (
                id, vehicle_id, user_id, date, expense_type, amount, notes, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&log.vehicle_id)
        .bind(&log.user_id)
        .bind(log.date)
        .bind(log.expense_type.as_str())
        .bind(log.amount)
        .bind(&log.notes)
        .bind(now)
        .fetch_one(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn list_for_vehicle(pool: &SqlitePool, vehicle_id: &str) -> AppResult<Vec<ExpenseLog>> {
        sqlx::query_as::<_, ExpenseLog>(
            "SELECT * FROM expense_logs WHERE vehicle_id = ? ORDER BY date DESC, created_at DESC",
        )
        .bind(vehicle_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn list_for_owner(pool: &SqlitePool, owner_id: &str) -> AppResult<Vec<ExpenseLog>> {
        sqlx::query_as::<_, ExpenseLog>(
            r#"
            SELECT e.* FROM expense_logs e
            JOIN vehicles v ON v.id = e.vehicle_id
            WHERE v.owner_id = ?
            ORDER BY e.date DESC, e.created_at DESC
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
            DELETE FROM expense_logs
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
