use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    dtos::{empty_string_as_none, validate_non_negative},
    models::{
        complaintmodel::Complaint, housemodel::{House, HouseStatus}, paymentmodel::Payment,
        residentmodel::Resident,
    },
};

/// Body for both creating and editing a house.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveHouseDto {
    #[validate(length(min = 1, max = 255, message = "House address is required"))]
    pub address: String,

    #[validate(length(min = 1, max = 100, message = "House type is required"))]
    #[serde(rename = "type")]
    pub house_type: String,

    #[validate(custom = "validate_non_negative")]
    pub land_area: BigDecimal,

    #[validate(custom = "validate_non_negative")]
    pub building_area: BigDecimal,

    pub status: HouseStatus,

    #[validate(length(max = 255, message = "Owner name must not exceed 255 characters"))]
    pub owner_name: Option<String>,

    #[validate(length(max = 20, message = "Owner phone must not exceed 20 characters"))]
    pub owner_phone: Option<String>,

    pub handover_date: Option<NaiveDate>,

    #[validate(custom = "validate_non_negative")]
    pub price: BigDecimal,

    #[validate(range(min = 0, message = "Number of bedrooms cannot be negative"))]
    pub bedrooms: i32,

    #[validate(range(min = 0, message = "Number of bathrooms cannot be negative"))]
    pub bathrooms: i32,

    #[validate(length(min = 1, max = 50, message = "Block/unit number is required"))]
    pub block_unit: String,

    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct HouseQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<HouseStatus>,
    #[serde(default, rename = "type", deserialize_with = "empty_string_as_none")]
    pub house_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HouseDetailDto {
    pub house: House,
    pub current_resident: Option<Resident>,
    pub residents: Vec<Resident>,
    pub payments: Vec<Payment>,
    pub complaints: Vec<Complaint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn house_body() -> SaveHouseDto {
        SaveHouseDto {
            address: "Jl. Kenanga No. 7".to_string(),
            house_type: "Type 36".to_string(),
            land_area: BigDecimal::from(72),
            building_area: BigDecimal::from(36),
            status: HouseStatus::Available,
            owner_name: None,
            owner_phone: None,
            handover_date: None,
            price: BigDecimal::from(350_000_000),
            bedrooms: 2,
            bathrooms: 1,
            block_unit: "B-07".to_string(),
            description: None,
        }
    }

    #[test]
    fn accepts_a_well_formed_house() {
        assert!(house_body().validate().is_ok());
    }

    #[test]
    fn rejects_negative_price_and_rooms() {
        let mut body = house_body();
        body.price = BigDecimal::from(-5);
        assert!(body.validate().is_err());

        let mut body = house_body();
        body.bedrooms = -1;
        assert!(body.validate().is_err());
    }

    #[test]
    fn block_unit_is_bounded() {
        let mut body = house_body();
        body.block_unit = "X".repeat(51);
        assert!(body.validate().is_err());

        body.block_unit = String::new();
        assert!(body.validate().is_err());
    }

    #[test]
    fn type_field_uses_wire_name() {
        let body: SaveHouseDto = serde_json::from_value(serde_json::json!({
            "address": "Jl. Mawar 1",
            "type": "Type 45",
            "land_area": "90.50",
            "building_area": 45,
            "status": "available",
            "price": "500000000",
            "bedrooms": 3,
            "bathrooms": 2,
            "block_unit": "C-01"
        }))
        .unwrap();
        assert_eq!(body.house_type, "Type 45");
        assert!(body.owner_name.is_none());
    }
}
