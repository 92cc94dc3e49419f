//! Keeps a house's occupancy status in step with its residents.
//!
//! Only resident creation and deletion move the house status. Updates never
//! do, even when a resident goes inactive.

use uuid::Uuid;

use crate::{models::housemodel::HouseStatus, service::error::ServiceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResidentEvent {
    Created,
    /// `other_active_residents` counts active residents left on the house,
    /// excluding the one being removed.
    Deleted { other_active_residents: i64 },
}

/// The status the house must move to after `event`, or `None` when it stays.
pub fn next_house_status(event: ResidentEvent, current: HouseStatus) -> Option<HouseStatus> {
    match (event, current) {
        (ResidentEvent::Created, HouseStatus::Available) => Some(HouseStatus::Occupied),
        (ResidentEvent::Created, _) => None,
        (
            ResidentEvent::Deleted {
                other_active_residents: 0,
            },
            HouseStatus::Occupied,
        ) => Some(HouseStatus::Available),
        (ResidentEvent::Deleted { .. }, _) => None,
    }
}

/// Locks the house row for the rest of the transaction and returns its status.
///
/// A missing house here means the resident points at nothing, which aborts
/// the whole unit of work.
pub async fn lock_house(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    house_id: Uuid,
) -> Result<HouseStatus, ServiceError> {
    let status: Option<HouseStatus> =
        sqlx::query_scalar(r#"SELECT status FROM houses WHERE id = $1 FOR UPDATE"#)
            .bind(house_id)
            .fetch_optional(&mut **tx)
            .await?;

    status.ok_or_else(|| {
        ServiceError::ConsistencyViolation(format!(
            "resident references house {} which does not exist",
            house_id
        ))
    })
}

/// Locks a resident row and returns the house it currently points at.
pub async fn lock_resident(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    resident_id: Uuid,
) -> Result<Uuid, ServiceError> {
    let house_id: Option<Uuid> =
        sqlx::query_scalar(r#"SELECT house_id FROM residents WHERE id = $1 FOR UPDATE"#)
            .bind(resident_id)
            .fetch_optional(&mut **tx)
            .await?;

    house_id.ok_or_else(|| ServiceError::not_found("Resident", resident_id))
}

/// Active residents on the house, leaving out `excluding_resident`.
pub async fn count_active_residents(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    house_id: Uuid,
    excluding_resident: Option<Uuid>,
) -> Result<i64, ServiceError> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM residents
        WHERE house_id = $1 AND ($2::uuid IS NULL OR id <> $2) AND status = 'active'
        "#,
    )
    .bind(house_id)
    .bind(excluding_resident)
    .fetch_one(&mut **tx)
    .await?;

    Ok(count)
}

/// Refuses a second active resident on a house. The house must already be
/// locked with [`lock_house`] so the count cannot go stale before the write.
pub async fn ensure_no_active_resident(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    house_id: Uuid,
    excluding_resident: Option<Uuid>,
) -> Result<(), ServiceError> {
    if count_active_residents(tx, house_id, excluding_resident).await? > 0 {
        return Err(ServiceError::Conflict(
            "This house already has an active resident".to_string(),
        ));
    }
    Ok(())
}

/// Applies the occupancy rule for `event` inside `tx`. The house must already
/// be locked with [`lock_house`].
pub async fn sync_house_status(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    house_id: Uuid,
    current: HouseStatus,
    event: ResidentEvent,
) -> Result<HouseStatus, ServiceError> {
    let Some(next) = next_house_status(event, current) else {
        return Ok(current);
    };

    let result = sqlx::query(r#"UPDATE houses SET status = $1, updated_at = NOW() WHERE id = $2"#)
        .bind(next)
        .bind(house_id)
        .execute(&mut **tx)
        .await?;

    if result.rows_affected() != 1 {
        return Err(ServiceError::ConsistencyViolation(format!(
            "house {} disappeared while updating its status",
            house_id
        )));
    }

    tracing::info!(
        "House {} status {} -> {} after resident {:?}",
        house_id,
        current.to_str(),
        next.to_str(),
        event
    );

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_on_available_house_occupies_it() {
        assert_eq!(
            next_house_status(ResidentEvent::Created, HouseStatus::Available),
            Some(HouseStatus::Occupied)
        );
    }

    #[test]
    fn create_leaves_sold_and_occupied_alone() {
        assert_eq!(
            next_house_status(ResidentEvent::Created, HouseStatus::Sold),
            None
        );
        assert_eq!(
            next_house_status(ResidentEvent::Created, HouseStatus::Occupied),
            None
        );
    }

    #[test]
    fn deleting_sole_active_resident_frees_house() {
        let event = ResidentEvent::Deleted {
            other_active_residents: 0,
        };
        assert_eq!(
            next_house_status(event, HouseStatus::Occupied),
            Some(HouseStatus::Available)
        );
    }

    #[test]
    fn deleting_one_of_several_keeps_house_occupied() {
        let event = ResidentEvent::Deleted {
            other_active_residents: 1,
        };
        assert_eq!(next_house_status(event, HouseStatus::Occupied), None);
    }

    #[test]
    fn delete_never_touches_sold_or_available() {
        let event = ResidentEvent::Deleted {
            other_active_residents: 0,
        };
        assert_eq!(next_house_status(event, HouseStatus::Sold), None);
        assert_eq!(next_house_status(event, HouseStatus::Available), None);
    }
}
