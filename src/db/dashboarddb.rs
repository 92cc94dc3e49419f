use async_trait::async_trait;
use sqlx::types::BigDecimal;
use uuid::Uuid;

use super::DBClient;

use crate::{
    dtos::dashboarddtos::{ComplaintCounts, HouseCounts, PaymentCounts},
    models::{complaintmodel::Complaint, housemodel::House, paymentmodel::Payment},
};

#[async_trait]
pub trait DashboardExt {
    async fn house_counts(&self) -> Result<HouseCounts, sqlx::Error>;

    async fn count_active_residents(&self) -> Result<i64, sqlx::Error>;

    async fn count_active_users(&self) -> Result<i64, sqlx::Error>;

    /// Pending and overdue payments, optionally only those of the resident
    /// linked to `resident_user_id`.
    async fn payment_counts(
        &self,
        resident_user_id: Option<Uuid>,
    ) -> Result<PaymentCounts, sqlx::Error>;

    async fn complaint_counts(
        &self,
        resident_user_id: Option<Uuid>,
        assigned_to: Option<Uuid>,
    ) -> Result<ComplaintCounts, sqlx::Error>;

    async fn total_sold_value(&self) -> Result<BigDecimal, sqlx::Error>;

    async fn recent_complaints(
        &self,
        resident_user_id: Option<Uuid>,
        assigned_to: Option<Uuid>,
        open_only: bool,
        limit: i64,
    ) -> Result<Vec<Complaint>, sqlx::Error>;

    async fn overdue_payments(&self, limit: i64) -> Result<Vec<Payment>, sqlx::Error>;

    async fn recent_payments_for_user(
        &self,
        resident_user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Payment>, sqlx::Error>;

    async fn newest_available_houses(&self, limit: i64) -> Result<Vec<House>, sqlx::Error>;
}

#[async_trait]
impl DashboardExt for DBClient {
    async fn house_counts(&self) -> Result<HouseCounts, sqlx::Error> {
        sqlx::query_as::<_, HouseCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'available') AS available,
                COUNT(*) FILTER (WHERE status = 'sold') AS sold,
                COUNT(*) FILTER (WHERE status = 'occupied') AS occupied
            FROM houses
            "#
        )
        .fetch_one(&self.pool)
        .await
    }

    async fn count_active_residents(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM residents WHERE status = 'active'"#)
            .fetch_one(&self.pool)
            .await
    }

    async fn count_active_users(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM users WHERE status = 'active'"#)
            .fetch_one(&self.pool)
            .await
    }

    async fn payment_counts(
        &self,
        resident_user_id: Option<Uuid>,
    ) -> Result<PaymentCounts, sqlx::Error> {
        sqlx::query_as::<_, PaymentCounts>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE p.status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE p.status = 'overdue') AS overdue
            FROM payments p
            LEFT JOIN residents r ON r.id = p.resident_id
            WHERE ($1::uuid IS NULL OR r.user_id = $1)
            "#
        )
        .bind(resident_user_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn complaint_counts(
        &self,
        resident_user_id: Option<Uuid>,
        assigned_to: Option<Uuid>,
    ) -> Result<ComplaintCounts, sqlx::Error> {
        sqlx::query_as::<_, ComplaintCounts>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE c.status = 'new') AS new,
                COUNT(*) FILTER (WHERE c.status = 'in_progress') AS in_progress,
                COUNT(*) FILTER (WHERE c.status IN ('new', 'in_progress')) AS open
            FROM complaints c
            JOIN residents r ON r.id = c.resident_id
            WHERE ($1::uuid IS NULL OR r.user_id = $1)
            AND ($2::uuid IS NULL OR c.assigned_to = $2)
            "#
        )
        .bind(resident_user_id)
        .bind(assigned_to)
        .fetch_one(&self.pool)
        .await
    }

    async fn total_sold_value(&self) -> Result<BigDecimal, sqlx::Error> {
        sqlx::query_scalar(
            r#"SELECT COALESCE(SUM(price), 0) FROM houses WHERE status = 'sold'"#
        )
        .fetch_one(&self.pool)
        .await
    }

    async fn recent_complaints(
        &self,
        resident_user_id: Option<Uuid>,
        assigned_to: Option<Uuid>,
        open_only: bool,
        limit: i64,
    ) -> Result<Vec<Complaint>, sqlx::Error> {
        sqlx::query_as::<_, Complaint>(
            r#"
            SELECT
                c.id, c.house_id, c.resident_id, c.assigned_to, c.title, c.description,
                c.status, c.priority, c.category, c.attachments, c.response, c.resolved_at,
                h.block_unit AS house_block_unit,
                r.name AS resident_name,
                r.user_id AS resident_user_id,
                u.name AS assigned_user_name,
                c.created_at, c.updated_at
            FROM complaints c
            JOIN houses h ON h.id = c.house_id
            JOIN residents r ON r.id = c.resident_id
            LEFT JOIN users u ON u.id = c.assigned_to
            WHERE ($1::uuid IS NULL OR r.user_id = $1)
            AND ($2::uuid IS NULL OR c.assigned_to = $2)
            AND (NOT $3 OR c.status IN ('new', 'in_progress'))
            ORDER BY c.created_at DESC
            LIMIT $4
            "#
        )
        .bind(resident_user_id)
        .bind(assigned_to)
        .bind(open_only)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn overdue_payments(&self, limit: i64) -> Result<Vec<Payment>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(
            r#"
            SELECT
                p.id, p.house_id, p.resident_id, p.payment_date, p.amount, p.type,
                p.status, p.due_date, p.description, p.notes,
                h.block_unit AS house_block_unit,
                r.name AS resident_name,
                r.user_id AS resident_user_id,
                p.created_at, p.updated_at
            FROM payments p
            JOIN houses h ON h.id = p.house_id
            LEFT JOIN residents r ON r.id = p.resident_id
            WHERE p.status = 'overdue'
            ORDER BY p.due_date ASC
            LIMIT $1
            "#
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn recent_payments_for_user(
        &self,
        resident_user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        sqlx::query_as::<_, Payment>(
            r#"
            SELECT
                p.id, p.house_id, p.resident_id, p.payment_date, p.amount, p.type,
                p.status, p.due_date, p.description, p.notes,
                h.block_unit AS house_block_unit,
                r.name AS resident_name,
                r.user_id AS resident_user_id,
                p.created_at, p.updated_at
            FROM payments p
            JOIN houses h ON h.id = p.house_id
            JOIN residents r ON r.id = p.resident_id
            WHERE r.user_id = $1
            ORDER BY p.payment_date DESC
            LIMIT $2
            "#
        )
        .bind(resident_user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn newest_available_houses(&self, limit: i64) -> Result<Vec<House>, sqlx::Error> {
        sqlx::query_as::<_, House>(
            r#"
            SELECT
                id, address, type, land_area, building_area, status, owner_name,
                owner_phone, handover_date, price, bedrooms, bathrooms, block_unit,
                description, created_at, updated_at
            FROM houses
            WHERE status = 'available'
            ORDER BY created_at DESC
            LIMIT $1
            "#
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }
}
