use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "resident_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResidentStatus {
    Active,
    Inactive,
}

impl ResidentStatus {
    pub fn to_str(&self) -> &str {
        match self {
            ResidentStatus::Active => "active",
            ResidentStatus::Inactive => "inactive",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Resident {
    pub id: Uuid,
    pub house_id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub move_in_date: Option<NaiveDate>,
    pub move_out_date: Option<NaiveDate>,
    pub status: ResidentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The part of a resident record that scopes a resident-role user's access.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, Copy, PartialEq, Eq)]
pub struct ResidentLink {
    pub id: Uuid,
    pub house_id: Uuid,
}

impl From<&Resident> for ResidentLink {
    fn from(resident: &Resident) -> Self {
        Self {
            id: resident.id,
            house_id: resident.house_id,
        }
    }
}
