use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{empty_string_as_none, validate_non_negative},
    models::paymentmodel::PaymentStatus,
};

/// Body for both recording and editing a payment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SavePaymentDto {
    pub house_id: Uuid,
    pub resident_id: Option<Uuid>,
    pub payment_date: NaiveDate,

    #[validate(custom = "validate_non_negative")]
    pub amount: BigDecimal,

    #[validate(length(min = 1, max = 100, message = "Payment type is required"))]
    #[serde(rename = "type")]
    pub payment_type: String,

    pub status: PaymentStatus,
    pub due_date: NaiveDate,
    pub description: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct PaymentQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<PaymentStatus>,
    #[serde(default, rename = "type", deserialize_with = "empty_string_as_none")]
    pub payment_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_amount_is_rejected() {
        let body: SavePaymentDto = serde_json::from_value(serde_json::json!({
            "house_id": Uuid::new_v4(),
            "payment_date": "2024-04-01",
            "amount": "-150000",
            "type": "maintenance",
            "status": "pending",
            "due_date": "2024-04-10"
        }))
        .unwrap();

        assert!(body.resident_id.is_none());
        assert!(body.validate().is_err());
    }

    #[test]
    fn unknown_status_fails_to_parse() {
        let parsed = serde_json::from_value::<SavePaymentDto>(serde_json::json!({
            "house_id": Uuid::new_v4(),
            "payment_date": "2024-04-01",
            "amount": 1000,
            "type": "rent",
            "status": "refunded",
            "due_date": "2024-04-10"
        }));
        assert!(parsed.is_err());
    }
}
