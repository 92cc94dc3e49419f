use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::BigDecimal, FromRow};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "house_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HouseStatus {
    Available,
    Sold,
    Occupied,
}

impl HouseStatus {
    pub fn to_str(&self) -> &str {
        match self {
            HouseStatus::Available => "available",
            HouseStatus::Sold => "sold",
            HouseStatus::Occupied => "occupied",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct House {
    pub id: Uuid,
    pub address: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub house_type: String,
    pub land_area: BigDecimal,
    pub building_area: BigDecimal,
    pub status: HouseStatus,

    // Owner details
    pub owner_name: Option<String>,
    pub owner_phone: Option<String>,
    pub handover_date: Option<NaiveDate>,

    pub price: BigDecimal,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub block_unit: String,
    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
