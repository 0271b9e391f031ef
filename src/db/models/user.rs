use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone_number: String,

    // Authorization tiers: plain user < staff (admin dashboard) < superuser
    pub is_manager: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    /// `false` means the account is suspended.
    pub is_active: bool,

    pub date_joined: NaiveDateTime,
    pub last_login: Option<NaiveDateTime>,
}

impl User {
    /// Staff or superuser: may read the admin panel and manage the catalog.
    pub fn is_staff_member(&self) -> bool {
        self.is_active && (self.is_staff || self.is_superuser)
    }

    pub fn is_admin(&self) -> bool {
        self.is_active && self.is_superuser
    }
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub phone_number: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfile {
    pub email: Option<String>,
    pub phone_number: Option<String>,
}
