pub mod complaintdtos;
pub mod dashboarddtos;
pub mod housedtos;
pub mod paymentdtos;
pub mod residentdtos;
pub mod userdtos;

use bigdecimal::BigDecimal;
use serde::{
    de::{value::StrDeserializer, DeserializeOwned, IntoDeserializer},
    Deserialize, Deserializer, Serialize,
};
use std::borrow::Cow;
use validator::ValidationError;

/// Query strings from list pages send empty values for unset filters.
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            let value: StrDeserializer<'_, D::Error> = value.into_deserializer();
            T::deserialize(value).map(Some)
        }
    }
}

/// Keeps an explicit `null` apart from a missing field: missing stays `None`
/// through `#[serde(default)]`, `null` becomes `Some(None)`.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub fn validate_non_negative(value: &BigDecimal) -> Result<(), ValidationError> {
    if *value < BigDecimal::from(0) {
        let mut error = ValidationError::new("negative_amount");
        error.message = Some(Cow::from("Value cannot be negative"));
        return Err(error);
    }
    Ok(())
}

/// Deepest page a listing serves. Anything past it is empty anyway and would
/// only push the offset towards overflow.
pub const MAX_PAGE: usize = 1_000_000;

#[derive(Debug, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: i64,
}

impl Pagination {
    pub fn new(page: Option<usize>, limit: Option<usize>, default_limit: usize) -> Self {
        Self {
            page: page.unwrap_or(1).clamp(1, MAX_PAGE),
            limit: limit.unwrap_or(default_limit).clamp(1, 50),
            total: 0,
        }
    }

    pub fn offset(&self) -> i64 {
        let skipped_pages = i64::try_from(self.page.saturating_sub(1)).unwrap_or(i64::MAX);
        let limit = i64::try_from(self.limit).unwrap_or(i64::MAX);
        skipped_pages.saturating_mul(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::housemodel::HouseStatus;

    #[derive(Deserialize)]
    struct Filters {
        #[serde(default, deserialize_with = "empty_string_as_none")]
        status: Option<HouseStatus>,
        #[serde(default, deserialize_with = "empty_string_as_none")]
        search: Option<String>,
    }

    #[test]
    fn empty_filters_are_ignored() {
        let filters: Filters =
            serde_json::from_str(r#"{"status": "", "search": "  "}"#).unwrap();
        assert!(filters.status.is_none());
        assert!(filters.search.is_none());

        let filters: Filters = serde_json::from_str(r#"{}"#).unwrap();
        assert!(filters.status.is_none());
    }

    #[test]
    fn filled_filters_are_parsed() {
        let filters: Filters =
            serde_json::from_str(r#"{"status": "occupied", "search": "blok a"}"#).unwrap();
        assert_eq!(filters.status, Some(HouseStatus::Occupied));
        assert_eq!(filters.search.as_deref(), Some("blok a"));
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<Filters>(r#"{"status": "demolished"}"#).is_err());
    }

    #[test]
    fn negative_amounts_fail() {
        assert!(validate_non_negative(&BigDecimal::from(0)).is_ok());
        assert!(validate_non_negative(&BigDecimal::from(-1)).is_err());
    }

    #[test]
    fn pagination_defaults_and_bounds() {
        let page = Pagination::new(None, None, 12);
        assert_eq!((page.page, page.limit, page.offset()), (1, 12, 0));

        let page = Pagination::new(Some(3), Some(500), 15);
        assert_eq!((page.page, page.limit, page.offset()), (3, 50, 100));

        let page = Pagination::new(Some(0), Some(0), 15);
        assert_eq!((page.page, page.limit), (1, 1));
    }

    #[test]
    fn huge_page_number_is_capped_without_overflow() {
        let page = Pagination::new(Some(usize::MAX), None, 15);
        assert_eq!(page.page, MAX_PAGE);
        assert_eq!(page.offset(), (MAX_PAGE as i64 - 1) * 15);

        let page = Pagination {
            page: usize::MAX,
            limit: usize::MAX,
            total: 0,
        };
        assert_eq!(page.offset(), i64::MAX);
    }
}
