use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{housedb::HouseExt, paymentdb::PaymentExt, residentdb::ResidentExt, DBClient},
    dtos::{
        paymentdtos::{PaymentQueryDto, SavePaymentDto},
        Pagination,
    },
    models::paymentmodel::Payment,
    service::{
        authorization::{can, list_scope, Action, Actor, EntityKind, Subject},
        error::ServiceError,
    },
};

pub const PAYMENTS_PER_PAGE: usize = 15;

#[derive(Debug, Clone)]
pub struct PaymentService {
    db_client: Arc<DBClient>,
}

impl PaymentService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn list(
        &self,
        actor: &Actor,
        filters: &PaymentQueryDto,
    ) -> Result<(Vec<Payment>, Pagination), ServiceError> {
        can(actor, Action::List, Subject::Kind(EntityKind::Payment)).into_result()?;

        let scope = list_scope(actor, EntityKind::Payment);
        let mut pagination = Pagination::new(filters.page, filters.limit, PAYMENTS_PER_PAGE);

        let (payments, total) = self
            .db_client
            .get_payments(scope.into(), filters, &pagination)
            .await?;
        pagination.total = total;

        Ok((payments, pagination))
    }

    pub async fn create(
        &self,
        actor: &Actor,
        body: &SavePaymentDto,
    ) -> Result<Payment, ServiceError> {
        can(actor, Action::Create, Subject::Kind(EntityKind::Payment)).into_result()?;
        self.ensure_references(body).await?;

        let payment = self.db_client.create_payment(body).await?;

        tracing::info!(
            "Payment {} of {} recorded for house {} by {}",
            payment.id,
            payment.amount,
            payment.house_id,
            actor.user_id
        );
        Ok(payment)
    }

    pub async fn get(&self, actor: &Actor, payment_id: Uuid) -> Result<Payment, ServiceError> {
        let payment = self.load(payment_id).await?;
        can(actor, Action::View, Subject::Payment(&payment)).into_result()?;
        Ok(payment)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        payment_id: Uuid,
        body: &SavePaymentDto,
    ) -> Result<Payment, ServiceError> {
        let payment = self.load(payment_id).await?;
        can(actor, Action::Update, Subject::Payment(&payment)).into_result()?;
        self.ensure_references(body).await?;

        self.db_client
            .update_payment(payment_id, body)
            .await?
            .ok_or_else(|| ServiceError::not_found("Payment", payment_id))
    }

    pub async fn delete(&self, actor: &Actor, payment_id: Uuid) -> Result<(), ServiceError> {
        let payment = self.load(payment_id).await?;
        can(actor, Action::Delete, Subject::Payment(&payment)).into_result()?;

        if !self.db_client.delete_payment(payment_id).await? {
            return Err(ServiceError::not_found("Payment", payment_id));
        }

        tracing::info!("Payment {} deleted by {}", payment_id, actor.user_id);
        Ok(())
    }

    async fn load(&self, payment_id: Uuid) -> Result<Payment, ServiceError> {
        self.db_client
            .get_payment(payment_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Payment", payment_id))
    }

    async fn ensure_references(&self, body: &SavePaymentDto) -> Result<(), ServiceError> {
        if self.db_client.get_house(body.house_id).await?.is_none() {
            return Err(ServiceError::Validation("Selected house is invalid".to_string()));
        }

        if let Some(resident_id) = body.resident_id {
            if self.db_client.get_resident(resident_id).await?.is_none() {
                return Err(ServiceError::Validation("Selected resident is invalid".to_string()));
            }
        }

        Ok(())
    }
}
