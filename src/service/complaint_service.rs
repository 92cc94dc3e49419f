use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{
        complaintdb::{self, ComplaintExt},
        userdb::UserExt,
        DBClient,
    },
    dtos::{
        complaintdtos::{
            ComplaintDetailDto, ComplaintQueryDto, CreateComplaintDto, UpdateComplaintDto,
        },
        Pagination,
    },
    models::complaintmodel::Complaint,
    service::{
        authorization::{
            can, check_complaint_fields, list_scope, Action, Actor, EntityKind, Subject,
        },
        error::ServiceError,
    },
};

pub const COMPLAINTS_PER_PAGE: usize = 15;

#[derive(Debug, Clone)]
pub struct ComplaintService {
    db_client: Arc<DBClient>,
}

impl ComplaintService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn list(
        &self,
        actor: &Actor,
        filters: &ComplaintQueryDto,
    ) -> Result<(Vec<Complaint>, Pagination), ServiceError> {
        can(actor, Action::List, Subject::Kind(EntityKind::Complaint)).into_result()?;

        let scope = list_scope(actor, EntityKind::Complaint);
        let mut pagination = Pagination::new(filters.page, filters.limit, COMPLAINTS_PER_PAGE);

        let (complaints, total) = self
            .db_client
            .get_complaints(scope.into(), filters, &pagination)
            .await?;
        pagination.total = total;

        Ok((complaints, pagination))
    }

    /// Files a complaint against the actor's own house.
    pub async fn create(
        &self,
        actor: &Actor,
        body: &CreateComplaintDto,
    ) -> Result<Complaint, ServiceError> {
        can(actor, Action::Create, Subject::Kind(EntityKind::Complaint)).into_result()?;

        let filed_by = actor.resident.ok_or_else(|| {
            ServiceError::AuthorizationDenied(
                "You must be registered as a resident to file a complaint.".to_string(),
            )
        })?;

        let complaint = self.db_client.create_complaint(filed_by, body).await?;

        tracing::info!(
            "Complaint {} filed for house {} by {}",
            complaint.id,
            complaint.house_id,
            actor.user_id
        );
        Ok(complaint)
    }

    pub async fn get(&self, actor: &Actor, complaint_id: Uuid) -> Result<Complaint, ServiceError> {
        let complaint = self.load(complaint_id).await?;
        can(actor, Action::View, Subject::Complaint(&complaint)).into_result()?;
        Ok(complaint)
    }

    pub async fn detail(
        &self,
        actor: &Actor,
        complaint_id: Uuid,
    ) -> Result<ComplaintDetailDto, ServiceError> {
        let complaint = self.get(actor, complaint_id).await?;

        let can_edit = can(actor, Action::Update, Subject::Complaint(&complaint)).is_allowed();
        let can_assign = actor.role.is_staff_manager();
        let can_respond = !actor.role.is_resident();

        let staff_users = if can_assign {
            self.db_client.get_staff_users().await?
        } else {
            Vec::new()
        };

        Ok(ComplaintDetailDto {
            complaint,
            staff_users,
            can_edit,
            can_assign,
            can_respond,
        })
    }

    /// Residents may only reword their own new complaints; staff fields are
    /// refused for them. Staff may also assign, respond and move status.
    ///
    /// The complaint row stays locked from the permission check to the write,
    /// so a status change committed in between cannot slip past the check.
    pub async fn update(
        &self,
        actor: &Actor,
        complaint_id: Uuid,
        body: &UpdateComplaintDto,
    ) -> Result<Complaint, ServiceError> {
        let mut tx = self.db_client.pool.begin().await?;

        let complaint = complaintdb::lock_complaint(&mut tx, complaint_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Complaint", complaint_id))?;
        can(actor, Action::Update, Subject::Complaint(&complaint)).into_result()?;
        check_complaint_fields(actor, &body.staff_fields_present()).into_result()?;

        if let Some(Some(assignee)) = body.assigned_to {
            if self.db_client.get_user(Some(assignee), None).await?.is_none() {
                return Err(ServiceError::Validation(
                    "Selected staff member is invalid".to_string(),
                ));
            }
        }

        let updated = complaintdb::update_complaint(&mut tx, complaint_id, body)
            .await?
            .ok_or_else(|| ServiceError::not_found("Complaint", complaint_id))?;

        tx.commit().await?;

        if updated.status != complaint.status {
            tracing::info!(
                "Complaint {} moved {} -> {} by {}",
                complaint_id,
                complaint.status.to_str(),
                updated.status.to_str(),
                actor.user_id
            );
            if updated.status.is_closed() {
                tracing::info!(
                    "Complaint {} resolved at {:?}",
                    complaint_id,
                    updated.resolved_at
                );
            }
        }
        Ok(updated)
    }

    pub async fn delete(&self, actor: &Actor, complaint_id: Uuid) -> Result<(), ServiceError> {
        let complaint = self.load(complaint_id).await?;
        can(actor, Action::Delete, Subject::Complaint(&complaint)).into_result()?;

        if !self.db_client.delete_complaint(complaint_id).await? {
            return Err(ServiceError::not_found("Complaint", complaint_id));
        }

        tracing::info!("Complaint {} deleted by {}", complaint_id, actor.user_id);
        Ok(())
    }

    async fn load(&self, complaint_id: Uuid) -> Result<Complaint, ServiceError> {
        self.db_client
            .get_complaint(complaint_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Complaint", complaint_id))
    }
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use super::*;
    use crate::{
        models::{
            complaintmodel::{ComplaintPriority, ComplaintStatus},
            housemodel::HouseStatus,
            residentmodel::{ResidentLink, ResidentStatus},
            usermodel::UserRole,
        },
        service::fixtures::{actor, db_client, seed_house, seed_resident, seed_user},
    };

    struct Filed {
        complaint_id: Uuid,
        resident: Actor,
    }

    async fn file_complaint(pool: &PgPool) -> Filed {
        let house_id = seed_house(pool, "F-01", HouseStatus::Occupied).await;
        let user_id = seed_user(pool, UserRole::Resident).await;
        let resident_id =
            seed_resident(pool, house_id, Some(user_id), ResidentStatus::Active).await;

        let complaint_id = sqlx::query_scalar(
            r#"
            INSERT INTO complaints (house_id, resident_id, title, description)
            VALUES ($1, $2, 'Leaking roof', 'Water drips in the kitchen')
            RETURNING id
            "#,
        )
        .bind(house_id)
        .bind(resident_id)
        .fetch_one(pool)
        .await
        .unwrap();

        let link = ResidentLink {
            id: resident_id,
            house_id,
        };
        Filed {
            complaint_id,
            resident: Actor::new(user_id, UserRole::Resident, Some(link)),
        }
    }

    fn edit(title: &str) -> UpdateComplaintDto {
        UpdateComplaintDto {
            title: title.to_string(),
            description: "Water drips in the kitchen".to_string(),
            priority: ComplaintPriority::High,
            category: None,
            attachments: None,
            status: None,
            assigned_to: None,
            response: None,
        }
    }

    #[sqlx::test]
    #[ignore = "needs a Postgres server in DATABASE_URL"]
    async fn resident_edit_is_refused_once_staff_has_moved_the_complaint(pool: PgPool) {
        let service = ComplaintService::new(db_client(&pool));
        let filed = file_complaint(&pool).await;

        let reworded = service
            .update(&filed.resident, filed.complaint_id, &edit("Leaking roof, bedroom too"))
            .await
            .unwrap();
        assert_eq!(reworded.title, "Leaking roof, bedroom too");

        let mut start_work = edit("Leaking roof, bedroom too");
        start_work.status = Some(ComplaintStatus::InProgress);
        service
            .update(&actor(UserRole::HousingManager), filed.complaint_id, &start_work)
            .await
            .unwrap();

        let late = service
            .update(&filed.resident, filed.complaint_id, &edit("Never mind"))
            .await;
        assert!(matches!(late, Err(ServiceError::AuthorizationDenied(_))));

        let stored = service.load(filed.complaint_id).await.unwrap();
        assert_eq!(stored.title, "Leaking roof, bedroom too");
        assert_eq!(stored.status, ComplaintStatus::InProgress);
    }

    #[sqlx::test]
    #[ignore = "needs a Postgres server in DATABASE_URL"]
    async fn staff_can_clear_assignment_and_response(pool: PgPool) {
        let service = ComplaintService::new(db_client(&pool));
        let manager = actor(UserRole::HousingManager);
        let filed = file_complaint(&pool).await;
        let technician = seed_user(&pool, UserRole::HousingManager).await;

        let mut assign = edit("Leaking roof");
        assign.assigned_to = Some(Some(technician));
        assign.response = Some(Some("Roofer booked for Monday".to_string()));
        let assigned = service
            .update(&manager, filed.complaint_id, &assign)
            .await
            .unwrap();
        assert_eq!(assigned.assigned_to, Some(technician));

        // absent staff fields leave the current values alone
        let kept = service
            .update(&manager, filed.complaint_id, &edit("Leaking roof"))
            .await
            .unwrap();
        assert_eq!(kept.assigned_to, Some(technician));
        assert_eq!(kept.response.as_deref(), Some("Roofer booked for Monday"));

        let mut clear = edit("Leaking roof");
        clear.assigned_to = Some(None);
        clear.response = Some(None);
        let cleared = service
            .update(&manager, filed.complaint_id, &clear)
            .await
            .unwrap();
        assert_eq!(cleared.assigned_to, None);
        assert_eq!(cleared.response, None);
    }

    #[sqlx::test]
    #[ignore = "needs a Postgres server in DATABASE_URL"]
    async fn missing_complaint_is_not_found_for_a_resident(pool: PgPool) {
        let service = ComplaintService::new(db_client(&pool));
        let filed = file_complaint(&pool).await;

        let missing = service
            .update(&filed.resident, Uuid::new_v4(), &edit("Anything"))
            .await;
        assert!(matches!(missing, Err(ServiceError::NotFound { .. })));
    }
}
