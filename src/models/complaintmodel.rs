use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "complaint_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    New,
    InProgress,
    Completed,
    Rejected,
}

impl ComplaintStatus {
    pub fn to_str(&self) -> &str {
        match self {
            ComplaintStatus::New => "new",
            ComplaintStatus::InProgress => "in_progress",
            ComplaintStatus::Completed => "completed",
            ComplaintStatus::Rejected => "rejected",
        }
    }

    /// Completed and rejected complaints are closed.
    pub fn is_closed(&self) -> bool {
        matches!(self, ComplaintStatus::Completed | ComplaintStatus::Rejected)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "complaint_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ComplaintPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl ComplaintPriority {
    pub fn to_str(&self) -> &str {
        match self {
            ComplaintPriority::Low => "low",
            ComplaintPriority::Medium => "medium",
            ComplaintPriority::High => "high",
            ComplaintPriority::Urgent => "urgent",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Complaint {
    pub id: Uuid,
    pub house_id: Uuid,
    pub resident_id: Uuid,
    pub assigned_to: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub status: ComplaintStatus,
    pub priority: ComplaintPriority,
    pub category: Option<String>,
    pub attachments: Option<Json<Vec<String>>>,
    pub response: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,

    // Joined from houses, residents and users
    pub house_block_unit: Option<String>,
    pub resident_name: Option<String>,
    #[serde(skip_serializing)]
    pub resident_user_id: Option<Uuid>,
    pub assigned_user_name: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_completed_and_rejected_are_closed() {
        assert!(!ComplaintStatus::New.is_closed());
        assert!(!ComplaintStatus::InProgress.is_closed());
        assert!(ComplaintStatus::Completed.is_closed());
        assert!(ComplaintStatus::Rejected.is_closed());
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(ComplaintPriority::default(), ComplaintPriority::Medium);
    }
}
