pub mod complaintdb;
pub mod dashboarddb;
pub mod housedb;
pub mod paymentdb;
pub mod residentdb;
pub mod userdb;

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{models::housemodel::HouseStatus, service::authorization::ListScope};

#[derive(Debug, Clone)]
pub struct DBClient {
    pub pool: Pool<Postgres>,
}

impl DBClient {
    pub fn new(pool: Pool<Postgres>) -> Self {
        DBClient { pool }
    }
}

/// Wraps a search term for a case-insensitive substring `ILIKE`, escaping
/// the pattern characters the user typed.
pub fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Bind values for the visibility part of a listing query. Every list query
/// binds these as `$1..$4` ahead of its own filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeParams {
    pub deny_all: bool,
    pub house_status: Option<HouseStatus>,
    pub user_id: Option<Uuid>,
    pub resident_id: Option<Uuid>,
}

impl From<ListScope> for ScopeParams {
    fn from(scope: ListScope) -> Self {
        match scope {
            ListScope::Unrestricted => ScopeParams::default(),
            ListScope::HouseStatus(status) => ScopeParams {
                house_status: Some(status),
                ..Default::default()
            },
            ListScope::OwnedByUser(user_id) => ScopeParams {
                user_id: Some(user_id),
                ..Default::default()
            },
            ListScope::OwnRecord(Some(resident_id)) => ScopeParams {
                resident_id: Some(resident_id),
                ..Default::default()
            },
            ListScope::OwnRecord(None) => ScopeParams {
                deny_all: true,
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_wraps_and_escapes() {
        assert_eq!(like_pattern("blok a"), "%blok a%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b\\c"), "%a\\_b\\\\c%");
    }

    #[test]
    fn scope_params_follow_scope() {
        assert_eq!(ScopeParams::from(ListScope::Unrestricted), ScopeParams::default());

        let params = ScopeParams::from(ListScope::HouseStatus(HouseStatus::Available));
        assert_eq!(params.house_status, Some(HouseStatus::Available));
        assert!(!params.deny_all);

        let user = Uuid::new_v4();
        assert_eq!(ScopeParams::from(ListScope::OwnedByUser(user)).user_id, Some(user));

        assert!(ScopeParams::from(ListScope::OwnRecord(None)).deny_all);
        let own = Uuid::new_v4();
        assert_eq!(ScopeParams::from(ListScope::OwnRecord(Some(own))).resident_id, Some(own));
    }
}
