use async_trait::async_trait;
use uuid::Uuid;

use super::{like_pattern, DBClient, ScopeParams};

use crate::{
    dtos::{
        paymentdtos::{PaymentQueryDto, SavePaymentDto},
        Pagination,
    },
    models::paymentmodel::Payment,
};

// Expects `p` to be the payments row, joined to its house and resident.
const PAYMENT_SELECT: &str = r#"
    SELECT
        p.id, p.house_id, p.resident_id, p.payment_date, p.amount, p.type,
        p.status, p.due_date, p.description, p.notes,
        h.block_unit AS house_block_unit,
        r.name AS resident_name,
        r.user_id AS resident_user_id,
        p.created_at, p.updated_at
"#;

const PAYMENT_JOINS: &str = r#"
    JOIN houses h ON h.id = p.house_id
    LEFT JOIN residents r ON r.id = p.resident_id
"#;

const PAYMENT_FILTERS: &str = r#"
    NOT $1
    AND ($2::house_status IS NULL OR h.status = $2)
    AND ($3::uuid IS NULL OR r.user_id = $3)
    AND ($4::uuid IS NULL OR p.resident_id = $4)
    AND ($5::text IS NULL OR p.type ILIKE $5 OR p.description ILIKE $5
         OR h.block_unit ILIKE $5)
    AND ($6::payment_status IS NULL OR p.status = $6)
    AND ($7::text IS NULL OR p.type = $7)
"#;

#[async_trait]
pub trait PaymentExt {
    async fn get_payment(&self, payment_id: Uuid) -> Result<Option<Payment>, sqlx::Error>;

    async fn get_payments(
        &self,
        scope: ScopeParams,
        filters: &PaymentQueryDto,
        pagination: &Pagination,
    ) -> Result<(Vec<Payment>, i64), sqlx::Error>;

    async fn get_payments_by_house(&self, house_id: Uuid) -> Result<Vec<Payment>, sqlx::Error>;

    async fn get_payments_by_resident(
        &self,
        resident_id: Uuid,
    ) -> Result<Vec<Payment>, sqlx::Error>;

    async fn create_payment(&self, body: &SavePaymentDto) -> Result<Payment, sqlx::Error>;

    async fn update_payment(
        &self,
        payment_id: Uuid,
        body: &SavePaymentDto,
    ) -> Result<Option<Payment>, sqlx::Error>;

    async fn delete_payment(&self, payment_id: Uuid) -> Result<bool, sqlx::Error>;
}

#[async_trait]
impl PaymentExt for DBClient {
    async fn get_payment(&self, payment_id: Uuid) -> Result<Option<Payment>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(&format!(
            "{} FROM payments p {} WHERE p.id = $1",
            PAYMENT_SELECT, PAYMENT_JOINS
        ))
        .bind(payment_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_payments(
        &self,
        scope: ScopeParams,
        filters: &PaymentQueryDto,
        pagination: &Pagination,
    ) -> Result<(Vec<Payment>, i64), sqlx::Error> {
        let search = filters.search.as_deref().map(like_pattern);

        let list_sql = format!(
            "{} FROM payments p {} WHERE {} ORDER BY p.created_at DESC LIMIT $8 OFFSET $9",
            PAYMENT_SELECT, PAYMENT_JOINS, PAYMENT_FILTERS
        );
        let payments = sqlx::query_as::<_, Payment>(&list_sql)
            .bind(scope.deny_all)
            .bind(scope.house_status)
            .bind(scope.user_id)
            .bind(scope.resident_id)
            .bind(search.as_deref())
            .bind(filters.status)
            .bind(filters.payment_type.as_deref())
            .bind(pagination.limit as i64)
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!(
            "SELECT COUNT(*) FROM payments p {} WHERE {}",
            PAYMENT_JOINS, PAYMENT_FILTERS
        );
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(scope.deny_all)
            .bind(scope.house_status)
            .bind(scope.user_id)
            .bind(scope.resident_id)
            .bind(search.as_deref())
            .bind(filters.status)
            .bind(filters.payment_type.as_deref())
            .fetch_one(&self.pool)
            .await?;

        Ok((payments, total))
    }

    async fn get_payments_by_house(&self, house_id: Uuid) -> Result<Vec<Payment>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(&format!(
            "{} FROM payments p {} WHERE p.house_id = $1 ORDER BY p.payment_date DESC",
            PAYMENT_SELECT, PAYMENT_JOINS
        ))
        .bind(house_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_payments_by_resident(
        &self,
        resident_id: Uuid,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(&format!(
            "{} FROM payments p {} WHERE p.resident_id = $1 ORDER BY p.payment_date DESC",
            PAYMENT_SELECT, PAYMENT_JOINS
        ))
        .bind(resident_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn create_payment(&self, body: &SavePaymentDto) -> Result<Payment, sqlx::Error> {
        sqlx::query_as::<_, Payment>(&format!(
            r#"
            WITH p AS (
                INSERT INTO payments (
                    house_id, resident_id, payment_date, amount, type, status,
                    due_date, description, notes
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING *
            )
            {} FROM p {}
            "#,
            PAYMENT_SELECT, PAYMENT_JOINS
        ))
        .bind(body.house_id)
        .bind(body.resident_id)
        .bind(body.payment_date)
        .bind(&body.amount)
        .bind(&body.payment_type)
        .bind(body.status)
        .bind(body.due_date)
        .bind(&body.description)
        .bind(&body.notes)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_payment(
        &self,
        payment_id: Uuid,
        body: &SavePaymentDto,
    ) -> Result<Option<Payment>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(&format!(
            r#"
            WITH p AS (
                UPDATE payments
                SET house_id = $2, resident_id = $3, payment_date = $4, amount = $5,
                    type = $6, status = $7, due_date = $8, description = $9,
                    notes = $10, updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            {} FROM p {}
            "#,
            PAYMENT_SELECT, PAYMENT_JOINS
        ))
        .bind(payment_id)
        .bind(body.house_id)
        .bind(body.resident_id)
        .bind(body.payment_date)
        .bind(&body.amount)
        .bind(&body.payment_type)
        .bind(body.status)
        .bind(body.due_date)
        .bind(&body.description)
        .bind(&body.notes)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_payment(&self, payment_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(r#"DELETE FROM payments WHERE id = $1"#)
            .bind(payment_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
