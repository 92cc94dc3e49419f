use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    dtos::empty_string_as_none,
    models::{
        complaintmodel::Complaint, housemodel::House, paymentmodel::Payment,
        residentmodel::{Resident, ResidentStatus},
    },
};

/// Body for both creating and editing a resident.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_move_dates"))]
pub struct SaveResidentDto {
    pub house_id: Uuid,
    pub user_id: Option<Uuid>,

    #[validate(length(min = 1, max = 255, message = "Resident name is required"))]
    pub name: String,

    #[validate(
        length(min = 1, max = 20, message = "Phone number is required"),
        custom = "validate_phone"
    )]
    pub phone: String,

    #[validate(
        email(message = "Email format is invalid"),
        length(max = 255, message = "Email must not exceed 255 characters")
    )]
    pub email: Option<String>,

    pub address: Option<String>,
    pub move_in_date: Option<NaiveDate>,
    pub move_out_date: Option<NaiveDate>,
    pub status: ResidentStatus,
    pub notes: Option<String>,
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let phone_regex = regex::Regex::new(r"^\+?[0-9][0-9 \-]{5,18}[0-9]$")
        .map_err(|_| ValidationError::new("invalid_phone_regex"))?;

    if !phone_regex.is_match(phone) {
        let mut error = ValidationError::new("invalid_phone");
        error.message = Some(Cow::from(
            "Phone number may only contain digits, spaces, dashes and a leading +",
        ));
        return Err(error);
    }
    Ok(())
}

fn validate_move_dates(body: &SaveResidentDto) -> Result<(), ValidationError> {
    if let (Some(move_in), Some(move_out)) = (body.move_in_date, body.move_out_date) {
        if move_out <= move_in {
            let mut error = ValidationError::new("move_out_date");
            error.message = Some(Cow::from("Move-out date must be after the move-in date"));
            return Err(error);
        }
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ResidentQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<ResidentStatus>,
}

#[derive(Debug, Serialize)]
pub struct ResidentDetailDto {
    pub resident: Resident,
    pub house: House,
    pub payments: Vec<Payment>,
    pub complaints: Vec<Complaint>,
}
