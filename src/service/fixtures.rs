//! Rows for the database-backed service tests. They are inserted directly so
//! each test starts from the exact state it describes.

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::DBClient,
    dtos::residentdtos::SaveResidentDto,
    models::{housemodel::HouseStatus, residentmodel::ResidentStatus, usermodel::UserRole},
    service::authorization::Actor,
};

pub fn db_client(pool: &PgPool) -> Arc<DBClient> {
    Arc::new(DBClient::new(pool.clone()))
}

pub fn actor(role: UserRole) -> Actor {
    Actor::new(Uuid::new_v4(), role, None)
}

pub async fn seed_user(pool: &PgPool, role: UserRole) -> Uuid {
    sqlx::query_scalar(
        r#"
        INSERT INTO users (name, email, password, role)
        VALUES ('Test User', $1, 'not-a-hash', $2)
        RETURNING id
        "#,
    )
    .bind(format!("{}@example.com", Uuid::new_v4()))
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn seed_house(pool: &PgPool, block_unit: &str, status: HouseStatus) -> Uuid {
    sqlx::query_scalar(
        r#"
        INSERT INTO houses (
            address, type, land_area, building_area, status, price, bedrooms,
            bathrooms, block_unit
        )
        VALUES ('Jl. Kenanga 1', 'Type 36', 90, 36, $1, 350000000, 2, 1, $2)
        RETURNING id
        "#,
    )
    .bind(status)
    .bind(block_unit)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn seed_resident(
    pool: &PgPool,
    house_id: Uuid,
    user_id: Option<Uuid>,
    status: ResidentStatus,
) -> Uuid {
    sqlx::query_scalar(
        r#"
        INSERT INTO residents (house_id, user_id, name, phone, status)
        VALUES ($1, $2, 'Budi', '081234567890', $3)
        RETURNING id
        "#,
    )
    .bind(house_id)
    .bind(user_id)
    .bind(status)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn house_status(pool: &PgPool, house_id: Uuid) -> HouseStatus {
    sqlx::query_scalar(r#"SELECT status FROM houses WHERE id = $1"#)
        .bind(house_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn active_residents(pool: &PgPool, house_id: Uuid) -> i64 {
    sqlx::query_scalar(
        r#"SELECT COUNT(*) FROM residents WHERE house_id = $1 AND status = 'active'"#,
    )
    .bind(house_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub fn resident_body(house_id: Uuid, status: ResidentStatus) -> SaveResidentDto {
    SaveResidentDto {
        house_id,
        user_id: None,
        name: "Sari Wulandari".to_string(),
        phone: "081298765432".to_string(),
        email: None,
        address: None,
        move_in_date: None,
        move_out_date: None,
        status,
        notes: None,
    }
}
