use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{residentmodel::ResidentLink, usermodel::User};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterUserDto {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(length(max = 20, message = "Phone number must not exceed 20 characters"))]
    pub phone: Option<String>,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,

    #[validate(
        length(min = 1, message = "Confirm Password is required"),
        must_match(other = "password", message = "passwords do not match")
    )]
    #[serde(rename = "passwordConfirm")]
    pub password_confirm: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(length(min = 1, message = "Email is required"), email(message = "Email is invalid"))]
    pub email: String,
    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
    pub status: String,
    pub resident: Option<ResidentLink>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User, resident: Option<ResidentLink>) -> Self {
        FilterUserDto {
            id: user.id.to_string(),
            name: user.name.to_owned(),
            email: user.email.to_owned(),
            role: user.role.to_str().to_string(),
            phone: user.phone.clone(),
            status: user.status.to_str().to_string(),
            resident,
            created_at: user.created_at,
        }
    }
}

/// Assignable staff member shown on complaint pages.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct StaffUserDto {
    pub id: Uuid,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserData {
    pub user: FilterUserDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponseDto {
    pub status: String,
    pub data: UserData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserLoginResponseDto {
    pub status: String,
    pub token: String,
}

#[derive(Serialize, Deserialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(password: &str, confirm: &str) -> RegisterUserDto {
        RegisterUserDto {
            name: "Budi".to_string(),
            email: "budi@example.com".to_string(),
            phone: None,
            password: password.to_string(),
            password_confirm: confirm.to_string(),
        }
    }

    #[test]
    fn register_requires_matching_passwords() {
        assert!(register("secret123", "secret123").validate().is_ok());
        assert!(register("secret123", "secret124").validate().is_err());
        assert!(register("short", "short").validate().is_err());
    }

    #[test]
    fn login_rejects_malformed_email() {
        let dto = LoginUserDto {
            email: "not-an-email".to_string(),
            password: "secret123".to_string(),
        };
        assert!(dto.validate().is_err());
    }
}
