use async_trait::async_trait;
use uuid::Uuid;

use super::DBClient;

use crate::{
    dtos::userdtos::StaffUserDto,
    models::{
        residentmodel::ResidentLink,
        usermodel::{User, UserRole, UserStatus},
    },
};

const USER_COLUMNS: &str =
    "id, name, email, password, role, phone, address, status, created_at, updated_at";

#[async_trait]
pub trait UserExt {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn save_user<T: Into<String> + Send>(
        &self,
        name: T,
        email: T,
        password: T,
        phone: Option<String>,
    ) -> Result<User, sqlx::Error>;

    async fn get_resident_link(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ResidentLink>, sqlx::Error>;

    async fn get_staff_users(&self) -> Result<Vec<StaffUserDto>, sqlx::Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut user: Option<User> = None;

        if let Some(user_id) = user_id {
            user = sqlx::query_as::<_, User>(&format!(
                "SELECT {} FROM users WHERE id = $1",
                USER_COLUMNS
            ))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(email) = email {
            user = sqlx::query_as::<_, User>(&format!(
                "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
                USER_COLUMNS
            ))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        }

        Ok(user)
    }

    async fn save_user<T: Into<String> + Send>(
        &self,
        name: T,
        email: T,
        password: T,
        phone: Option<String>,
    ) -> Result<User, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password, phone, role, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(name.into())
        .bind(email.into())
        .bind(password.into())
        .bind(phone)
        .bind(UserRole::Resident)
        .bind(UserStatus::Active)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn get_resident_link(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ResidentLink>, sqlx::Error> {
        sqlx::query_as::<_, ResidentLink>(
            r#"SELECT id, house_id FROM residents WHERE user_id = $1"#
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_staff_users(&self) -> Result<Vec<StaffUserDto>, sqlx::Error> {
        sqlx::query_as::<_, StaffUserDto>(
            r#"
            SELECT id, name, role::text AS role
            FROM users
            WHERE role IN ('administrator', 'housing_manager') AND status = 'active'
            ORDER BY name
            "#
        )
        .fetch_all(&self.pool)
        .await
    }
}
