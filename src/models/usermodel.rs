use chrono::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Customer,
    Driver,
    Admin,
}

impl UserRole {
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Driver => "driver",
            UserRole::Admin => "admin",
        }
    }
}

/// A row in `profiles`. Written by the identity/admin surface; this service
/// reads it to resolve the caller and to find a driver's payout destination.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Profile {
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub approved: bool,
    pub stripe_account_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
