use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::BigDecimal, FromRow};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl PaymentStatus {
    pub fn to_str(&self) -> &str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Overdue => "overdue",
            PaymentStatus::Cancelled => "cancelled",
        }
    }
}

/// A payment row joined with the owning house's block/unit and the
/// user account behind its resident (if any).
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Payment {
    pub id: Uuid,
    pub house_id: Uuid,
    pub resident_id: Option<Uuid>,
    pub payment_date: NaiveDate,
    pub amount: BigDecimal,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub payment_type: String,
    pub status: PaymentStatus,
    pub due_date: NaiveDate,
    pub description: Option<String>,
    pub notes: Option<String>,

    pub house_block_unit: Option<String>,
    pub resident_name: Option<String>,
    #[serde(skip_serializing)]
    pub resident_user_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
