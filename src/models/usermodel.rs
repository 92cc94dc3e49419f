use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Administrator,
    HousingManager,
    SalesStaff,
    Resident,
}

impl UserRole {
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::Administrator => "administrator",
            UserRole::HousingManager => "housing_manager",
            UserRole::SalesStaff => "sales_staff",
            UserRole::Resident => "resident",
        }
    }

    pub fn is_administrator(&self) -> bool {
        matches!(self, UserRole::Administrator)
    }

    pub fn is_housing_manager(&self) -> bool {
        matches!(self, UserRole::HousingManager)
    }

    pub fn is_sales_staff(&self) -> bool {
        matches!(self, UserRole::SalesStaff)
    }

    pub fn is_resident(&self) -> bool {
        matches!(self, UserRole::Resident)
    }

    /// Administrators and housing managers run day-to-day operations.
    pub fn is_staff_manager(&self) -> bool {
        self.is_administrator() || self.is_housing_manager()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "user_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn to_str(&self) -> &str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: UserStatus,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}
