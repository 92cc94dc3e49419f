use async_trait::async_trait;
use uuid::Uuid;

use super::{like_pattern, DBClient, ScopeParams};

use crate::{
    dtos::{
        housedtos::{HouseQueryDto, SaveHouseDto},
        Pagination,
    },
    models::housemodel::House,
};

const HOUSE_COLUMNS: &str = r#"
    h.id, h.address, h.type, h.land_area, h.building_area, h.status,
    h.owner_name, h.owner_phone, h.handover_date, h.price, h.bedrooms,
    h.bathrooms, h.block_unit, h.description, h.created_at, h.updated_at
"#;

// $1..$4 are the scope binds, $5..$7 the page filters.
const HOUSE_FILTERS: &str = r#"
    NOT $1
    AND ($2::house_status IS NULL OR h.status = $2)
    AND ($3::uuid IS NULL OR EXISTS (
        SELECT 1 FROM residents r WHERE r.house_id = h.id AND r.user_id = $3))
    AND ($4::uuid IS NULL OR EXISTS (
        SELECT 1 FROM residents r WHERE r.house_id = h.id AND r.id = $4))
    AND ($5::text IS NULL OR h.address ILIKE $5 OR h.block_unit ILIKE $5 OR h.type ILIKE $5)
    AND ($6::house_status IS NULL OR h.status = $6)
    AND ($7::text IS NULL OR h.type = $7)
"#;

#[async_trait]
pub trait HouseExt {
    async fn get_house(&self, house_id: Uuid) -> Result<Option<House>, sqlx::Error>;

    async fn get_houses(
        &self,
        scope: ScopeParams,
        filters: &HouseQueryDto,
        pagination: &Pagination,
    ) -> Result<(Vec<House>, i64), sqlx::Error>;

    async fn create_house(&self, body: &SaveHouseDto) -> Result<House, sqlx::Error>;

    async fn update_house(
        &self,
        house_id: Uuid,
        body: &SaveHouseDto,
    ) -> Result<Option<House>, sqlx::Error>;

    async fn delete_house(&self, house_id: Uuid) -> Result<bool, sqlx::Error>;
}

#[async_trait]
impl HouseExt for DBClient {
    async fn get_house(&self, house_id: Uuid) -> Result<Option<House>, sqlx::Error> {
        sqlx::query_as::<_, House>(&format!(
            "SELECT {} FROM houses h WHERE h.id = $1",
            HOUSE_COLUMNS
        ))
        .bind(house_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_houses(
        &self,
        scope: ScopeParams,
        filters: &HouseQueryDto,
        pagination: &Pagination,
    ) -> Result<(Vec<House>, i64), sqlx::Error> {
        let search = filters.search.as_deref().map(like_pattern);

        let list_sql = format!(
            "SELECT {} FROM houses h WHERE {} ORDER BY h.created_at DESC LIMIT $8 OFFSET $9",
            HOUSE_COLUMNS, HOUSE_FILTERS
        );
        let houses = sqlx::query_as::<_, House>(&list_sql)
            .bind(scope.deny_all)
            .bind(scope.house_status)
            .bind(scope.user_id)
            .bind(scope.resident_id)
            .bind(search.as_deref())
            .bind(filters.status)
            .bind(filters.house_type.as_deref())
            .bind(pagination.limit as i64)
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM houses h WHERE {}", HOUSE_FILTERS);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(scope.deny_all)
            .bind(scope.house_status)
            .bind(scope.user_id)
            .bind(scope.resident_id)
            .bind(search.as_deref())
            .bind(filters.status)
            .bind(filters.house_type.as_deref())
            .fetch_one(&self.pool)
            .await?;

        Ok((houses, total))
    }

    async fn create_house(&self, body: &SaveHouseDto) -> Result<House, sqlx::Error> {
        sqlx::query_as::<_, House>(&format!(
            r#"
            INSERT INTO houses AS h (
                address, type, land_area, building_area, status, owner_name,
                owner_phone, handover_date, price, bedrooms, bathrooms,
                block_unit, description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            HOUSE_COLUMNS
        ))
        .bind(&body.address)
        .bind(&body.house_type)
        .bind(&body.land_area)
        .bind(&body.building_area)
        .bind(body.status)
        .bind(&body.owner_name)
        .bind(&body.owner_phone)
        .bind(body.handover_date)
        .bind(&body.price)
        .bind(body.bedrooms)
        .bind(body.bathrooms)
        .bind(&body.block_unit)
        .bind(&body.description)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_house(
        &self,
        house_id: Uuid,
        body: &SaveHouseDto,
    ) -> Result<Option<House>, sqlx::Error> {
        sqlx::query_as::<_, House>(&format!(
            r#"
            UPDATE houses AS h
            SET address = $2, type = $3, land_area = $4, building_area = $5,
                status = $6, owner_name = $7, owner_phone = $8, handover_date = $9,
                price = $10, bedrooms = $11, bathrooms = $12, block_unit = $13,
                description = $14, updated_at = NOW()
            WHERE h.id = $1
            RETURNING {}
            "#,
            HOUSE_COLUMNS
        ))
        .bind(house_id)
        .bind(&body.address)
        .bind(&body.house_type)
        .bind(&body.land_area)
        .bind(&body.building_area)
        .bind(body.status)
        .bind(&body.owner_name)
        .bind(&body.owner_phone)
        .bind(body.handover_date)
        .bind(&body.price)
        .bind(body.bedrooms)
        .bind(body.bathrooms)
        .bind(&body.block_unit)
        .bind(&body.description)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_house(&self, house_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(r#"DELETE FROM houses WHERE id = $1"#)
            .bind(house_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
