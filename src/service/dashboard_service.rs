use std::sync::Arc;

use crate::{
    db::{dashboarddb::DashboardExt, DBClient},
    dtos::dashboarddtos::{DashboardDto, PaymentCounts},
    models::usermodel::UserRole,
    service::{authorization::Actor, error::ServiceError},
};

const RECENT_ITEMS: i64 = 5;
const NEWEST_AVAILABLE_HOUSES: i64 = 8;

#[derive(Debug, Clone)]
pub struct DashboardService {
    db_client: Arc<DBClient>,
}

impl DashboardService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    pub async fn dashboard(&self, actor: &Actor) -> Result<DashboardDto, ServiceError> {
        let db = &self.db_client;

        let dashboard = match actor.role {
            UserRole::Administrator => DashboardDto::Administrator {
                houses: db.house_counts().await?,
                active_residents: db.count_active_residents().await?,
                active_users: db.count_active_users().await?,
                payments: db.payment_counts(None).await?,
                complaints: db.complaint_counts(None, None).await?,
                recent_complaints: db.recent_complaints(None, None, false, RECENT_ITEMS).await?,
                overdue_payments: db.overdue_payments(RECENT_ITEMS).await?,
            },
            UserRole::HousingManager => DashboardDto::HousingManager {
                houses: db.house_counts().await?,
                active_residents: db.count_active_residents().await?,
                payments: db.payment_counts(None).await?,
                complaints: db.complaint_counts(None, None).await?,
                assigned_open_complaints: db
                    .complaint_counts(None, Some(actor.user_id))
                    .await?
                    .open,
                assigned_complaints: db
                    .recent_complaints(None, Some(actor.user_id), true, RECENT_ITEMS)
                    .await?,
            },
            UserRole::SalesStaff => {
                let houses = db.house_counts().await?;
                DashboardDto::SalesStaff {
                    available_houses: houses.available,
                    sold_houses: houses.sold,
                    total_sold_value: db.total_sold_value().await?,
                    newest_available: db.newest_available_houses(NEWEST_AVAILABLE_HOUSES).await?,
                }
            }
            UserRole::Resident => match actor.resident {
                Some(_) => DashboardDto::Resident {
                    payments: db.payment_counts(Some(actor.user_id)).await?,
                    open_complaints: db
                        .complaint_counts(Some(actor.user_id), None)
                        .await?
                        .open,
                    recent_payments: db
                        .recent_payments_for_user(actor.user_id, RECENT_ITEMS)
                        .await?,
                    recent_complaints: db
                        .recent_complaints(Some(actor.user_id), None, false, RECENT_ITEMS)
                        .await?,
                },
                None => DashboardDto::Resident {
                    payments: PaymentCounts::default(),
                    open_complaints: 0,
                    recent_payments: Vec::new(),
                    recent_complaints: Vec::new(),
                },
            },
        };

        Ok(dashboard)
    }
}
