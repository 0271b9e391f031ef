use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::choices::ExpenseType;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ExpenseLog {
    pub id: String,
    pub vehicle_id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub expense_type: String,
    pub amount: f64,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct CreateExpenseLog {
    pub vehicle_id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub expense_type: ExpenseType,
    pub amount: f64,
    pub notes: Option<String>,
}
