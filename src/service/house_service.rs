use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{
        complaintdb::ComplaintExt, housedb::HouseExt, paymentdb::PaymentExt,
        residentdb::ResidentExt, DBClient,
    },
    dtos::{
        housedtos::{HouseDetailDto, HouseQueryDto, SaveHouseDto},
        Pagination,
    },
    models::housemodel::House,
    service::{
        authorization::{can, list_scope, Action, Actor, EntityKind, Subject},
        error::{is_unique_violation, ServiceError},
    },
};

pub const HOUSES_PER_PAGE: usize = 12;

#[derive(Debug, Clone)]
pub struct HouseService {
    db_client: Arc<DBClient>,
}

impl HouseService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn list(
        &self,
        actor: &Actor,
        filters: &HouseQueryDto,
    ) -> Result<(Vec<House>, Pagination), ServiceError> {
        can(actor, Action::List, Subject::Kind(EntityKind::House)).into_result()?;

        let scope = list_scope(actor, EntityKind::House);
        let mut pagination = Pagination::new(filters.page, filters.limit, HOUSES_PER_PAGE);

        let (houses, total) = self
            .db_client
            .get_houses(scope.into(), filters, &pagination)
            .await?;
        pagination.total = total;

        Ok((houses, pagination))
    }

    pub async fn create(&self, actor: &Actor, body: &SaveHouseDto) -> Result<House, ServiceError> {
        can(actor, Action::Create, Subject::Kind(EntityKind::House)).into_result()?;

        let house = self
            .db_client
            .create_house(body)
            .await
            .map_err(|e| duplicate_block_unit(e, &body.block_unit))?;

        tracing::info!("House {} ({}) created by {}", house.id, house.block_unit, actor.user_id);
        Ok(house)
    }

    /// Loads a house the actor may view.
    pub async fn get(&self, actor: &Actor, house_id: Uuid) -> Result<House, ServiceError> {
        let house = self.load(house_id).await?;
        can(actor, Action::View, Subject::House(&house)).into_result()?;
        Ok(house)
    }

    pub async fn detail(
        &self,
        actor: &Actor,
        house_id: Uuid,
    ) -> Result<HouseDetailDto, ServiceError> {
        let house = self.get(actor, house_id).await?;

        let current_resident = self.db_client.get_current_resident(house.id).await?;
        let residents = self.db_client.get_residents_by_house(house.id).await?;
        let payments = self.db_client.get_payments_by_house(house.id).await?;
        let complaints = self.db_client.get_complaints_by_house(house.id).await?;

        Ok(HouseDetailDto {
            house,
            current_resident,
            residents,
            payments,
            complaints,
        })
    }

    pub async fn update(
        &self,
        actor: &Actor,
        house_id: Uuid,
        body: &SaveHouseDto,
    ) -> Result<House, ServiceError> {
        let house = self.load(house_id).await?;
        can(actor, Action::Update, Subject::House(&house)).into_result()?;

        self.db_client
            .update_house(house_id, body)
            .await
            .map_err(|e| duplicate_block_unit(e, &body.block_unit))?
            .ok_or_else(|| ServiceError::not_found("House", house_id))
    }

    /// Removes the house together with its residents, payments and complaints.
    pub async fn delete(&self, actor: &Actor, house_id: Uuid) -> Result<(), ServiceError> {
        let house = self.load(house_id).await?;
        can(actor, Action::Delete, Subject::House(&house)).into_result()?;

        if !self.db_client.delete_house(house_id).await? {
            return Err(ServiceError::not_found("House", house_id));
        }

        tracing::info!("House {} ({}) deleted by {}", house.id, house.block_unit, actor.user_id);
        Ok(())
    }

    async fn load(&self, house_id: Uuid) -> Result<House, ServiceError> {
        self.db_client
            .get_house(house_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("House", house_id))
    }
}

fn duplicate_block_unit(error: sqlx::Error, block_unit: &str) -> ServiceError {
    if is_unique_violation(&error) {
        ServiceError::Conflict(format!("Block/unit {} is already registered", block_unit))
    } else {
        ServiceError::Database(error)
    }
}
