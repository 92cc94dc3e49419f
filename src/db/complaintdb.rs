use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use super::{like_pattern, DBClient, ScopeParams};

use crate::{
    dtos::{
        complaintdtos::{ComplaintQueryDto, CreateComplaintDto, UpdateComplaintDto},
        Pagination,
    },
    models::{complaintmodel::Complaint, residentmodel::ResidentLink},
};

const COMPLAINT_SELECT: &str = r#"
    SELECT
        c.id, c.house_id, c.resident_id, c.assigned_to, c.title, c.description,
        c.status, c.priority, c.category, c.attachments, c.response, c.resolved_at,
        h.block_unit AS house_block_unit,
        r.name AS resident_name,
        r.user_id AS resident_user_id,
        u.name AS assigned_user_name,
        c.created_at, c.updated_at
"#;

const COMPLAINT_JOINS: &str = r#"
    JOIN houses h ON h.id = c.house_id
    JOIN residents r ON r.id = c.resident_id
    LEFT JOIN users u ON u.id = c.assigned_to
"#;

const COMPLAINT_FILTERS: &str = r#"
    NOT $1
    AND ($2::house_status IS NULL OR h.status = $2)
    AND ($3::uuid IS NULL OR r.user_id = $3)
    AND ($4::uuid IS NULL OR c.resident_id = $4)
    AND ($5::text IS NULL OR c.title ILIKE $5 OR c.description ILIKE $5
         OR c.category ILIKE $5)
    AND ($6::complaint_status IS NULL OR c.status = $6)
    AND ($7::complaint_priority IS NULL OR c.priority = $7)
"#;

#[async_trait]
pub trait ComplaintExt {
    async fn get_complaint(&self, complaint_id: Uuid) -> Result<Option<Complaint>, sqlx::Error>;

    async fn get_complaints(
        &self,
        scope: ScopeParams,
        filters: &ComplaintQueryDto,
        pagination: &Pagination,
    ) -> Result<(Vec<Complaint>, i64), sqlx::Error>;

    async fn get_complaints_by_house(&self, house_id: Uuid) -> Result<Vec<Complaint>, sqlx::Error>;

    async fn get_complaints_by_resident(
        &self,
        resident_id: Uuid,
    ) -> Result<Vec<Complaint>, sqlx::Error>;

    async fn create_complaint(
        &self,
        filed_by: ResidentLink,
        body: &CreateComplaintDto,
    ) -> Result<Complaint, sqlx::Error>;

    async fn delete_complaint(&self, complaint_id: Uuid) -> Result<bool, sqlx::Error>;
}

#[async_trait]
impl ComplaintExt for DBClient {
    async fn get_complaint(&self, complaint_id: Uuid) -> Result<Option<Complaint>, sqlx::Error> {
        sqlx::query_as::<_, Complaint>(&format!(
            "{} FROM complaints c {} WHERE c.id = $1",
            COMPLAINT_SELECT, COMPLAINT_JOINS
        ))
        .bind(complaint_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_complaints(
        &self,
        scope: ScopeParams,
        filters: &ComplaintQueryDto,
        pagination: &Pagination,
    ) -> Result<(Vec<Complaint>, i64), sqlx::Error> {
        let search = filters.search.as_deref().map(like_pattern);

        let list_sql = format!(
            "{} FROM complaints c {} WHERE {} ORDER BY c.created_at DESC LIMIT $8 OFFSET $9",
            COMPLAINT_SELECT, COMPLAINT_JOINS, COMPLAINT_FILTERS
        );
        let complaints = sqlx::query_as::<_, Complaint>(&list_sql)
            .bind(scope.deny_all)
            .bind(scope.house_status)
            .bind(scope.user_id)
            .bind(scope.resident_id)
            .bind(search.as_deref())
            .bind(filters.status)
            .bind(filters.priority)
            .bind(pagination.limit as i64)
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!(
            "SELECT COUNT(*) FROM complaints c {} WHERE {}",
            COMPLAINT_JOINS, COMPLAINT_FILTERS
        );
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(scope.deny_all)
            .bind(scope.house_status)
            .bind(scope.user_id)
            .bind(scope.resident_id)
            .bind(search.as_deref())
            .bind(filters.status)
            .bind(filters.priority)
            .fetch_one(&self.pool)
            .await?;

        Ok((complaints, total))
    }

    async fn get_complaints_by_house(&self, house_id: Uuid) -> Result<Vec<Complaint>, sqlx::Error> {
        sqlx::query_as::<_, Complaint>(&format!(
            "{} FROM complaints c {} WHERE c.house_id = $1 ORDER BY c.created_at DESC",
            COMPLAINT_SELECT, COMPLAINT_JOINS
        ))
        .bind(house_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_complaints_by_resident(
        &self,
        resident_id: Uuid,
    ) -> Result<Vec<Complaint>, sqlx::Error> {
        sqlx::query_as::<_, Complaint>(&format!(
            "{} FROM complaints c {} WHERE c.resident_id = $1 ORDER BY c.created_at DESC",
            COMPLAINT_SELECT, COMPLAINT_JOINS
        ))
        .bind(resident_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn create_complaint(
        &self,
        filed_by: ResidentLink,
        body: &CreateComplaintDto,
    ) -> Result<Complaint, sqlx::Error> {
        sqlx::query_as::<_, Complaint>(&format!(
            r#"
            WITH c AS (
                INSERT INTO complaints (
                    house_id, resident_id, title, description, status, priority,
                    category, attachments
                )
                VALUES ($1, $2, $3, $4, 'new', $5, $6, $7)
                RETURNING *
            )
            {} FROM c {}
            "#,
            COMPLAINT_SELECT, COMPLAINT_JOINS
        ))
        .bind(filed_by.house_id)
        .bind(filed_by.id)
        .bind(&body.title)
        .bind(&body.description)
        .bind(body.priority)
        .bind(&body.category)
        .bind(body.attachments.clone().map(Json))
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_complaint(&self, complaint_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(r#"DELETE FROM complaints WHERE id = $1"#)
            .bind(complaint_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Loads a complaint and locks its row until the transaction ends, so the
/// checks made on it still hold when the update lands.
pub async fn lock_complaint(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    complaint_id: Uuid,
) -> Result<Option<Complaint>, sqlx::Error> {
    sqlx::query_as::<_, Complaint>(&format!(
        "{} FROM complaints c {} WHERE c.id = $1 FOR UPDATE OF c",
        COMPLAINT_SELECT, COMPLAINT_JOINS
    ))
    .bind(complaint_id)
    .fetch_optional(&mut **tx)
    .await
}

/// Writes the resident-editable fields and every staff field present in the
/// body. An explicit null clears `assigned_to` or `response`. Moving into
/// `completed` or `rejected` stamps `resolved_at`; moving out of them clears it.
pub async fn update_complaint(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    complaint_id: Uuid,
    body: &UpdateComplaintDto,
) -> Result<Option<Complaint>, sqlx::Error> {
    sqlx::query_as::<_, Complaint>(&format!(
        r#"
        WITH c AS (
            UPDATE complaints AS cur
            SET title = $2, description = $3, priority = $4, category = $5,
                attachments = $6,
                status = COALESCE($7, cur.status),
                assigned_to = CASE WHEN $10::bool THEN $8::uuid ELSE cur.assigned_to END,
                response = CASE WHEN $11::bool THEN $9::text ELSE cur.response END,
                resolved_at = CASE
                    WHEN $7::complaint_status IS NULL THEN cur.resolved_at
                    WHEN $7 IN ('completed', 'rejected') AND cur.status = $7
                        THEN COALESCE(cur.resolved_at, NOW())
                    WHEN $7 IN ('completed', 'rejected') THEN NOW()
                    ELSE NULL
                END,
                updated_at = NOW()
            WHERE cur.id = $1
            RETURNING cur.*
        )
        {} FROM c {}
        "#,
        COMPLAINT_SELECT, COMPLAINT_JOINS
    ))
    .bind(complaint_id)
    .bind(&body.title)
    .bind(&body.description)
    .bind(body.priority)
    .bind(&body.category)
    .bind(body.attachments.clone().map(Json))
    .bind(body.status)
    .bind(body.assigned_to.flatten())
    .bind(body.response.as_ref().and_then(|response| response.as_deref()))
    .bind(body.assigned_to.is_some())
    .bind(body.response.is_some())
    .fetch_optional(&mut **tx)
    .await
}
