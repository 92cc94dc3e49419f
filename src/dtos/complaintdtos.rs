use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    dtos::{double_option, empty_string_as_none, userdtos::StaffUserDto},
    models::complaintmodel::{Complaint, ComplaintPriority, ComplaintStatus},
    service::authorization::COMPLAINT_STAFF_FIELDS,
};

fn validate_attachments(attachments: &Vec<String>) -> Result<(), ValidationError> {
    if attachments.iter().any(|path| path.is_empty() || path.len() > 255) {
        let mut error = ValidationError::new("attachments");
        error.message = Some(Cow::from("Each attachment must be between 1 and 255 characters"));
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateComplaintDto {
    #[validate(length(min = 1, max = 255, message = "Complaint title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Complaint description is required"))]
    pub description: String,

    #[serde(default)]
    pub priority: ComplaintPriority,

    #[validate(length(max = 100, message = "Category must not exceed 100 characters"))]
    pub category: Option<String>,

    #[validate(custom = "validate_attachments")]
    pub attachments: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateComplaintDto {
    #[validate(length(min = 1, max = 255, message = "Complaint title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Complaint description is required"))]
    pub description: String,

    pub priority: ComplaintPriority,

    #[validate(length(max = 100, message = "Category must not exceed 100 characters"))]
    pub category: Option<String>,

    #[validate(custom = "validate_attachments")]
    pub attachments: Option<Vec<String>>,

    // Staff only. `null` clears the assignment or the response.
    pub status: Option<ComplaintStatus>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub assigned_to: Option<Option<Uuid>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub response: Option<Option<String>>,
}

impl UpdateComplaintDto {
    /// Staff-only fields present in the request body.
    pub fn staff_fields_present(&self) -> Vec<&'static str> {
        let present = [
            self.status.is_some(),
            self.assigned_to.is_some(),
            self.response.is_some(),
        ];

        COMPLAINT_STAFF_FIELDS
            .iter()
            .zip(present)
            .filter(|(_, is_present)| *is_present)
            .map(|(field, _)| *field)
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ComplaintQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<ComplaintStatus>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub priority: Option<ComplaintPriority>,
}

#[derive(Debug, Serialize)]
pub struct ComplaintDetailDto {
    pub complaint: Complaint,
    pub staff_users: Vec<StaffUserDto>,
    pub can_edit: bool,
    pub can_assign: bool,
    pub can_respond: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update_body() -> UpdateComplaintDto {
        UpdateComplaintDto {
            title: "Broken gate".to_string(),
            description: "The front gate does not lock".to_string(),
            priority: ComplaintPriority::Medium,
            category: Some("security".to_string()),
            attachments: Some(vec!["uploads/gate.jpg".to_string()]),
            status: None,
            assigned_to: None,
            response: None,
        }
    }

    #[test]
    fn resident_style_update_touches_no_staff_field() {
        let body = update_body();
        assert!(body.validate().is_ok());
        assert!(body.staff_fields_present().is_empty());
    }

    #[test]
    fn staff_fields_are_reported_in_order() {
        let mut body = update_body();
        body.response = Some(Some("Technician scheduled".to_string()));
        body.status = Some(ComplaintStatus::InProgress);
        assert_eq!(body.staff_fields_present(), vec!["status", "response"]);
    }

    #[test]
    fn null_staff_field_is_present_and_clears() {
        let body: UpdateComplaintDto = serde_json::from_value(serde_json::json!({
            "title": "Broken gate",
            "description": "The front gate does not lock",
            "priority": "medium",
            "assigned_to": null
        }))
        .unwrap();
        assert_eq!(body.assigned_to, Some(None));
        assert_eq!(body.response, None);
        assert_eq!(body.staff_fields_present(), vec!["assigned_to"]);

        let assignee = Uuid::new_v4();
        let body: UpdateComplaintDto = serde_json::from_value(serde_json::json!({
            "title": "Broken gate",
            "description": "The front gate does not lock",
            "priority": "medium",
            "assigned_to": assignee
        }))
        .unwrap();
        assert_eq!(body.assigned_to, Some(Some(assignee)));
    }

    #[test]
    fn attachments_are_length_checked() {
        let mut body = update_body();
        body.attachments = Some(vec!["a".repeat(256)]);
        assert!(body.validate().is_err());
    }

    #[test]
    fn create_defaults_priority_to_medium() {
        let body: CreateComplaintDto = serde_json::from_value(serde_json::json!({
            "title": "Street light out",
            "description": "The light in front of B-07 is off"
        }))
        .unwrap();
        assert_eq!(body.priority, ComplaintPriority::Medium);
        assert!(body.validate().is_ok());
    }
}
