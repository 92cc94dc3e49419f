use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{
        complaintdb::ComplaintExt,
        housedb::HouseExt,
        paymentdb::PaymentExt,
        residentdb::{self, ResidentExt},
        userdb::UserExt,
        DBClient,
    },
    dtos::{
        residentdtos::{ResidentDetailDto, ResidentQueryDto, SaveResidentDto},
        Pagination,
    },
    models::residentmodel::{Resident, ResidentStatus},
    service::{
        authorization::{can, list_scope, Action, Actor, EntityKind, ListScope, Subject},
        error::{is_unique_violation, ServiceError},
        occupancy::{self, ResidentEvent},
    },
};

pub const RESIDENTS_PER_PAGE: usize = 15;

/// Result of a resident listing. Residents never see the list itself, only
/// their own record.
#[derive(Debug)]
pub enum ResidentListing {
    Page(Vec<Resident>, Pagination),
    OwnRecord(Uuid),
}

#[derive(Debug, Clone)]
pub struct ResidentService {
    db_client: Arc<DBClient>,
}

impl ResidentService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn list(
        &self,
        actor: &Actor,
        filters: &ResidentQueryDto,
    ) -> Result<ResidentListing, ServiceError> {
        can(actor, Action::List, Subject::Kind(EntityKind::Resident)).into_result()?;

        let scope = list_scope(actor, EntityKind::Resident);
        match scope {
            ListScope::OwnRecord(Some(resident_id)) => {
                return Ok(ResidentListing::OwnRecord(resident_id));
            }
            ListScope::OwnRecord(None) => {
                return Err(ServiceError::not_found(
                    "Resident record for user",
                    actor.user_id,
                ));
            }
            _ => {}
        }

        let mut pagination = Pagination::new(filters.page, filters.limit, RESIDENTS_PER_PAGE);
        let (residents, total) = self
            .db_client
            .get_residents(scope.into(), filters, &pagination)
            .await?;
        pagination.total = total;

        Ok(ResidentListing::Page(residents, pagination))
    }

    /// Registers a resident and marks an available house as occupied in the
    /// same transaction. A house never gets a second active resident.
    pub async fn create(
        &self,
        actor: &Actor,
        body: &SaveResidentDto,
    ) -> Result<Resident, ServiceError> {
        can(actor, Action::Create, Subject::Kind(EntityKind::Resident)).into_result()?;

        self.ensure_house_exists(body.house_id).await?;
        self.ensure_user_linkable(body.user_id, None).await?;

        let mut tx = self.db_client.pool.begin().await?;

        let house_status = occupancy::lock_house(&mut tx, body.house_id).await?;
        if body.status == ResidentStatus::Active {
            occupancy::ensure_no_active_resident(&mut tx, body.house_id, None).await?;
        }

        let resident = residentdb::insert_resident(&mut tx, body)
            .await
            .map_err(resident_conflict)?;

        occupancy::sync_house_status(&mut tx, body.house_id, house_status, ResidentEvent::Created)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Resident {} added to house {} by {}",
            resident.id,
            resident.house_id,
            actor.user_id
        );
        Ok(resident)
    }

    pub async fn get(&self, actor: &Actor, resident_id: Uuid) -> Result<Resident, ServiceError> {
        let resident = self.load(resident_id).await?;
        can(actor, Action::View, Subject::Resident(&resident)).into_result()?;
        Ok(resident)
    }

    pub async fn detail(
        &self,
        actor: &Actor,
        resident_id: Uuid,
    ) -> Result<ResidentDetailDto, ServiceError> {
        let resident = self.get(actor, resident_id).await?;

        let house = self
            .db_client
            .get_house(resident.house_id)
            .await?
            .ok_or_else(|| {
                ServiceError::ConsistencyViolation(format!(
                    "resident {} references missing house {}",
                    resident.id, resident.house_id
                ))
            })?;
        let payments = self.db_client.get_payments_by_resident(resident.id).await?;
        let complaints = self.db_client.get_complaints_by_resident(resident.id).await?;

        Ok(ResidentDetailDto {
            resident,
            house,
            payments,
            complaints,
        })
    }

    /// Edits a resident. The house status is left alone, even when the
    /// resident moves house or goes inactive, but an active resident may not
    /// land on a house that already has one.
    pub async fn update(
        &self,
        actor: &Actor,
        resident_id: Uuid,
        body: &SaveResidentDto,
    ) -> Result<Resident, ServiceError> {
        let resident = self.load(resident_id).await?;
        can(actor, Action::Update, Subject::Resident(&resident)).into_result()?;

        self.ensure_house_exists(body.house_id).await?;
        self.ensure_user_linkable(body.user_id, Some(resident_id)).await?;

        let mut tx = self.db_client.pool.begin().await?;

        occupancy::lock_resident(&mut tx, resident_id).await?;
        occupancy::lock_house(&mut tx, body.house_id).await?;
        if body.status == ResidentStatus::Active {
            occupancy::ensure_no_active_resident(&mut tx, body.house_id, Some(resident_id))
                .await?;
        }

        let updated = residentdb::update_resident(&mut tx, resident_id, body)
            .await
            .map_err(resident_conflict)?
            .ok_or_else(|| ServiceError::not_found("Resident", resident_id))?;

        tx.commit().await?;

        tracing::info!("Resident {} updated by {}", resident_id, actor.user_id);
        Ok(updated)
    }

    /// Removes a resident. An occupied house with no other active resident
    /// goes back to available in the same transaction.
    pub async fn delete(&self, actor: &Actor, resident_id: Uuid) -> Result<(), ServiceError> {
        let resident = self.load(resident_id).await?;
        can(actor, Action::Delete, Subject::Resident(&resident)).into_result()?;

        let mut tx = self.db_client.pool.begin().await?;

        let house_id = occupancy::lock_resident(&mut tx, resident_id).await?;
        let house_status = occupancy::lock_house(&mut tx, house_id).await?;
        let other_active_residents =
            occupancy::count_active_residents(&mut tx, house_id, Some(resident_id)).await?;

        sqlx::query(r#"DELETE FROM residents WHERE id = $1"#)
            .bind(resident_id)
            .execute(&mut *tx)
            .await?;

        occupancy::sync_house_status(
            &mut tx,
            house_id,
            house_status,
            ResidentEvent::Deleted {
                other_active_residents,
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            "Resident {} removed from house {} by {}",
            resident_id,
            house_id,
            actor.user_id
        );
        Ok(())
    }

    async fn load(&self, resident_id: Uuid) -> Result<Resident, ServiceError> {
        self.db_client
            .get_resident(resident_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Resident", resident_id))
    }

    async fn ensure_house_exists(&self, house_id: Uuid) -> Result<(), ServiceError> {
        match self.db_client.get_house(house_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::Validation("Selected house is invalid".to_string())),
        }
    }

    /// A user may back at most one resident record.
    async fn ensure_user_linkable(
        &self,
        user_id: Option<Uuid>,
        excluding_resident: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let Some(user_id) = user_id else {
            return Ok(());
        };

        if self.db_client.get_user(Some(user_id), None).await?.is_none() {
            return Err(ServiceError::Validation("Selected user is invalid".to_string()));
        }

        if self
            .db_client
            .get_resident_linked_to(user_id, excluding_resident)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(
                "This user is already linked to another resident".to_string(),
            ));
        }

        Ok(())
    }
}

const ONE_ACTIVE_PER_HOUSE: &str = "residents_one_active_per_house_key";

/// Maps the unique indexes on `residents` to conflicts. They back up the
/// checks above when two writes race.
fn resident_conflict(error: sqlx::Error) -> ServiceError {
    if !is_unique_violation(&error) {
        return ServiceError::Database(error);
    }

    let constraint = error
        .as_database_error()
        .and_then(|db_error| db_error.constraint());

    if constraint == Some(ONE_ACTIVE_PER_HOUSE) {
        ServiceError::Conflict("This house already has an active resident".to_string())
    } else {
        ServiceError::Conflict("This user is already linked to another resident".to_string())
    }
}
