use serde::Serialize;
use sqlx::{types::BigDecimal, FromRow};

use crate::models::{complaintmodel::Complaint, housemodel::House, paymentmodel::Payment};

#[derive(Debug, Default, Serialize, FromRow, PartialEq, Eq)]
pub struct HouseCounts {
    pub total: i64,
    pub available: i64,
    pub sold: i64,
    pub occupied: i64,
}

#[derive(Debug, Default, Serialize, FromRow, PartialEq, Eq)]
pub struct PaymentCounts {
    pub pending: i64,
    pub overdue: i64,
}

#[derive(Debug, Default, Serialize, FromRow, PartialEq, Eq)]
pub struct ComplaintCounts {
    pub new: i64,
    pub in_progress: i64,
    pub open: i64,
}

#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum DashboardDto {
    Administrator {
        houses: HouseCounts,
        active_residents: i64,
        active_users: i64,
        payments: PaymentCounts,
        complaints: ComplaintCounts,
        recent_complaints: Vec<Complaint>,
        overdue_payments: Vec<Payment>,
    },
    HousingManager {
        houses: HouseCounts,
        active_residents: i64,
        payments: PaymentCounts,
        complaints: ComplaintCounts,
        assigned_open_complaints: i64,
        assigned_complaints: Vec<Complaint>,
    },
    SalesStaff {
        available_houses: i64,
        sold_houses: i64,
        total_sold_value: BigDecimal,
        newest_available: Vec<House>,
    },
    Resident {
        payments: PaymentCounts,
        open_complaints: i64,
        recent_payments: Vec<Payment>,
        recent_complaints: Vec<Complaint>,
    },
}
