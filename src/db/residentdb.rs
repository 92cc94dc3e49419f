use async_trait::async_trait;
use uuid::Uuid;

use super::{like_pattern, DBClient, ScopeParams};

use crate::{
    dtos::{
        residentdtos::{ResidentQueryDto, SaveResidentDto},
        Pagination,
    },
    models::residentmodel::Resident,
};

const RESIDENT_COLUMNS: &str = r#"
    r.id, r.house_id, r.user_id, r.name, r.phone, r.email, r.address,
    r.move_in_date, r.move_out_date, r.status, r.notes, r.created_at, r.updated_at
"#;

const RESIDENT_FILTERS: &str = r#"
    NOT $1
    AND ($2::house_status IS NULL OR EXISTS (
        SELECT 1 FROM houses h WHERE h.id = r.house_id AND h.status = $2))
    AND ($3::uuid IS NULL OR r.user_id = $3)
    AND ($4::uuid IS NULL OR r.id = $4)
    AND ($5::text IS NULL OR r.name ILIKE $5 OR r.phone ILIKE $5 OR r.email ILIKE $5)
    AND ($6::resident_status IS NULL OR r.status = $6)
"#;

#[async_trait]
pub trait ResidentExt {
    async fn get_resident(&self, resident_id: Uuid) -> Result<Option<Resident>, sqlx::Error>;

    async fn get_residents(
        &self,
        scope: ScopeParams,
        filters: &ResidentQueryDto,
        pagination: &Pagination,
    ) -> Result<(Vec<Resident>, i64), sqlx::Error>;

    async fn get_residents_by_house(&self, house_id: Uuid) -> Result<Vec<Resident>, sqlx::Error>;

    /// Most recently added active resident of the house.
    async fn get_current_resident(&self, house_id: Uuid) -> Result<Option<Resident>, sqlx::Error>;

    /// Another resident record already linked to `user_id`, if any.
    async fn get_resident_linked_to(
        &self,
        user_id: Uuid,
        excluding_resident: Option<Uuid>,
    ) -> Result<Option<Uuid>, sqlx::Error>;
}

#[async_trait]
impl ResidentExt for DBClient {
    async fn get_resident(&self, resident_id: Uuid) -> Result<Option<Resident>, sqlx::Error> {
        sqlx::query_as::<_, Resident>(&format!(
            "SELECT {} FROM residents r WHERE r.id = $1",
            RESIDENT_COLUMNS
        ))
        .bind(resident_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_residents(
        &self,
        scope: ScopeParams,
        filters: &ResidentQueryDto,
        pagination: &Pagination,
    ) -> Result<(Vec<Resident>, i64), sqlx::Error> {
        let search = filters.search.as_deref().map(like_pattern);

        let list_sql = format!(
            "SELECT {} FROM residents r WHERE {} ORDER BY r.created_at DESC LIMIT $7 OFFSET $8",
            RESIDENT_COLUMNS, RESIDENT_FILTERS
        );
        let residents = sqlx::query_as::<_, Resident>(&list_sql)
            .bind(scope.deny_all)
            .bind(scope.house_status)
            .bind(scope.user_id)
            .bind(scope.resident_id)
            .bind(search.as_deref())
            .bind(filters.status)
            .bind(pagination.limit as i64)
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM residents r WHERE {}", RESIDENT_FILTERS);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(scope.deny_all)
            .bind(scope.house_status)
            .bind(scope.user_id)
            .bind(scope.resident_id)
            .bind(search.as_deref())
            .bind(filters.status)
            .fetch_one(&self.pool)
            .await?;

        Ok((residents, total))
    }

    async fn get_residents_by_house(&self, house_id: Uuid) -> Result<Vec<Resident>, sqlx::Error> {
        sqlx::query_as::<_, Resident>(&format!(
            "SELECT {} FROM residents r WHERE r.house_id = $1 ORDER BY r.created_at DESC",
            RESIDENT_COLUMNS
        ))
        .bind(house_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_current_resident(&self, house_id: Uuid) -> Result<Option<Resident>, sqlx::Error> {
        sqlx::query_as::<_, Resident>(&format!(
            r#"
            SELECT {} FROM residents r
            WHERE r.house_id = $1 AND r.status = 'active'
            ORDER BY r.created_at DESC
            LIMIT 1
            "#,
            RESIDENT_COLUMNS
        ))
        .bind(house_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_resident_linked_to(
        &self,
        user_id: Uuid,
        excluding_resident: Option<Uuid>,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT id FROM residents
            WHERE user_id = $1 AND ($2::uuid IS NULL OR id <> $2)
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(excluding_resident)
        .fetch_optional(&self.pool)
        .await
    }
}

/// Inserts a resident inside the caller's transaction. The occupancy rule
/// runs in the same unit of work.
pub async fn insert_resident(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    body: &SaveResidentDto,
) -> Result<Resident, sqlx::Error> {
    sqlx::query_as::<_, Resident>(&format!(
        r#"
        INSERT INTO residents AS r (
            house_id, user_id, name, phone, email, address, move_in_date,
            move_out_date, status, notes
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {}
        "#,
        RESIDENT_COLUMNS
    ))
    .bind(body.house_id)
    .bind(body.user_id)
    .bind(&body.name)
    .bind(&body.phone)
    .bind(&body.email)
    .bind(&body.address)
    .bind(body.move_in_date)
    .bind(body.move_out_date)
    .bind(body.status)
    .bind(&body.notes)
    .fetch_one(&mut **tx)
    .await
}

pub async fn update_resident(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    resident_id: Uuid,
    body: &SaveResidentDto,
) -> Result<Option<Resident>, sqlx::Error> {
    sqlx::query_as::<_, Resident>(&format!(
        r#"
        UPDATE residents AS r
        SET house_id = $2, user_id = $3, name = $4, phone = $5, email = $6,
            address = $7, move_in_date = $8, move_out_date = $9, status = $10,
            notes = $11, updated_at = NOW()
        WHERE r.id = $1
        RETURNING {}
        "#,
        RESIDENT_COLUMNS
    ))
    .bind(resident_id)
    .bind(body.house_id)
    .bind(body.user_id)
    .bind(&body.name)
    .bind(&body.phone)
    .bind(&body.email)
    .bind(&body.address)
    .bind(body.move_in_date)
    .bind(body.move_out_date)
    .bind(body.status)
    .bind(&body.notes)
    .fetch_optional(&mut **tx)
    .await
}
