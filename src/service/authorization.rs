//! Role-based access decisions for houses, residents, payments and complaints.
//!
//! Every handler goes through [`can`] before touching the store, and listing
//! endpoints narrow their queries with [`list_scope`]. Both are pure functions
//! of the actor and the target so the whole rule table is testable without a
//! database.

use serde::Serialize;
use uuid::Uuid;

use crate::models::{
    complaintmodel::{Complaint, ComplaintStatus},
    housemodel::{House, HouseStatus},
    paymentmodel::Payment,
    residentmodel::{Resident, ResidentLink},
    usermodel::{User, UserRole},
};
use crate::service::error::ServiceError;

/// The authenticated user as seen by the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: UserRole,
    pub resident: Option<ResidentLink>,
}

impl Actor {
    pub fn new(user_id: Uuid, role: UserRole, resident: Option<ResidentLink>) -> Self {
        Self {
            user_id,
            role,
            resident,
        }
    }

    pub fn from_user(user: &User, resident: Option<ResidentLink>) -> Self {
        Self::new(user.id, user.role, resident)
    }

    fn owns_resident_record(&self, resident_user_id: Option<Uuid>) -> bool {
        resident_user_id == Some(self.user_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Create,
    View,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityKind {
    House,
    Resident,
    Payment,
    Complaint,
}

impl EntityKind {
    pub fn to_str(&self) -> &str {
        match self {
            EntityKind::House => "house",
            EntityKind::Resident => "resident",
            EntityKind::Payment => "payment",
            EntityKind::Complaint => "complaint",
        }
    }
}

/// What an action is aimed at: a whole entity class for list/create, a
/// concrete record for view/update/delete.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    Kind(EntityKind),
    House(&'a House),
    Resident(&'a Resident),
    Payment(&'a Payment),
    Complaint(&'a Complaint),
}

impl Subject<'_> {
    pub fn kind(&self) -> EntityKind {
        match self {
            Subject::Kind(kind) => *kind,
            Subject::House(_) => EntityKind::House,
            Subject::Resident(_) => EntityKind::Resident,
            Subject::Payment(_) => EntityKind::Payment,
            Subject::Complaint(_) => EntityKind::Complaint,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(String),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self) -> Result<(), ServiceError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(ServiceError::AuthorizationDenied(reason)),
        }
    }
}

fn allow_if(condition: bool, reason: &str) -> Decision {
    if condition {
        Decision::Allow
    } else {
        Decision::Deny(reason.to_string())
    }
}

/// Which rows a listing may return for an actor. Applied before any user
/// supplied filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    Unrestricted,
    HouseStatus(HouseStatus),
    OwnedByUser(Uuid),
    /// The actor never sees the list, only its own record (if linked).
    OwnRecord(Option<Uuid>),
}

pub fn can(actor: &Actor, action: Action, subject: Subject<'_>) -> Decision {
    let role = actor.role;

    match (action, subject) {
        (Action::List, _) => Decision::Allow,

        (Action::Create, subject) => match subject.kind() {
            EntityKind::House => allow_if(
                role.is_administrator(),
                "You do not have permission to add houses.",
            ),
            EntityKind::Resident => allow_if(
                role.is_staff_manager(),
                "You do not have permission to add residents.",
            ),
            EntityKind::Payment => allow_if(
                !role.is_resident(),
                "You do not have permission to add payments.",
            ),
            EntityKind::Complaint => {
                if !role.is_resident() {
                    Decision::Deny("Only residents can file complaints.".to_string())
                } else if actor.resident.is_none() {
                    Decision::Deny(
                        "You must be registered as a resident to file a complaint.".to_string(),
                    )
                } else {
                    Decision::Allow
                }
            }
        },

        (_, Subject::Kind(kind)) => Decision::Deny(format!(
            "This action requires a specific {} record.",
            kind.to_str()
        )),

        // Houses
        (Action::View, Subject::House(house)) => allow_if(
            !role.is_resident()
                || actor.resident.map(|link| link.house_id) == Some(house.id),
            "You can only view your own house.",
        ),
        (Action::Update, Subject::House(_)) => allow_if(
            role.is_staff_manager(),
            "You do not have permission to edit houses.",
        ),
        (Action::Delete, Subject::House(_)) => allow_if(
            role.is_administrator(),
            "You do not have permission to delete houses.",
        ),

        // Residents
        (Action::View, Subject::Resident(resident)) => allow_if(
            !role.is_resident() || actor.resident.map(|link| link.id) == Some(resident.id),
            "You can only view your own resident data.",
        ),
        (Action::Update, Subject::Resident(_)) => allow_if(
            role.is_staff_manager(),
            "You do not have permission to edit residents.",
        ),
        (Action::Delete, Subject::Resident(_)) => allow_if(
            role.is_staff_manager(),
            "You do not have permission to delete residents.",
        ),

        // Payments
        (Action::View, Subject::Payment(payment)) => allow_if(
            !role.is_resident() || actor.owns_resident_record(payment.resident_user_id),
            "You can only view your own payment history.",
        ),
        (Action::Update, Subject::Payment(_)) => allow_if(
            !role.is_resident(),
            "You do not have permission to edit payments.",
        ),
        (Action::Delete, Subject::Payment(_)) => allow_if(
            !role.is_resident(),
            "You do not have permission to delete payments.",
        ),

        // Complaints
        (Action::View, Subject::Complaint(complaint)) => allow_if(
            !role.is_resident() || actor.owns_resident_record(complaint.resident_user_id),
            "You can only view your own complaints.",
        ),
        (Action::Update, Subject::Complaint(complaint)) => {
            if role.is_resident() {
                allow_if(
                    actor.owns_resident_record(complaint.resident_user_id)
                        && complaint.status == ComplaintStatus::New,
                    "You can only edit your own complaints while they are still new.",
                )
            } else {
                allow_if(
                    role.is_staff_manager(),
                    "You do not have permission to edit complaints.",
                )
            }
        }
        (Action::Delete, Subject::Complaint(_)) => allow_if(
            role.is_staff_manager(),
            "You do not have permission to delete complaints.",
        ),
    }
}

pub fn list_scope(actor: &Actor, kind: EntityKind) -> ListScope {
    match (kind, actor.role) {
        (EntityKind::House, UserRole::SalesStaff) => ListScope::HouseStatus(HouseStatus::Available),
        (EntityKind::Resident, UserRole::Resident) => {
            ListScope::OwnRecord(actor.resident.map(|link| link.id))
        }
        (EntityKind::Payment, UserRole::Resident) | (EntityKind::Complaint, UserRole::Resident) => {
            ListScope::OwnedByUser(actor.user_id)
        }
        _ => ListScope::Unrestricted,
    }
}

/// Complaint fields only administrators and housing managers may write.
pub const COMPLAINT_STAFF_FIELDS: [&str; 3] = ["status", "assigned_to", "response"];

/// Field-level check for complaint updates. `touched_staff_fields` lists the
/// staff-only fields present in the request.
pub fn check_complaint_fields(actor: &Actor, touched_staff_fields: &[&str]) -> Decision {
    if actor.role.is_resident() && !touched_staff_fields.is_empty() {
        return Decision::Deny(format!(
            "Residents cannot change {} on a complaint.",
            touched_staff_fields.join(", ")
        ));
    }

    Decision::Allow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        complaintmodel::ComplaintPriority, paymentmodel::PaymentStatus,
        residentmodel::ResidentStatus,
    };
    use chrono::{NaiveDate, Utc};
    use sqlx::types::BigDecimal;

    fn staff(role: UserRole) -> Actor {
        Actor::new(Uuid::new_v4(), role, None)
    }

    fn resident_actor(link: Option<ResidentLink>) -> Actor {
        Actor::new(Uuid::new_v4(), UserRole::Resident, link)
    }

    fn house(status: HouseStatus) -> House {
        House {
            id: Uuid::new_v4(),
            address: "Jl. Melati 3".to_string(),
            house_type: "Type 45".to_string(),
            land_area: BigDecimal::from(120),
            building_area: BigDecimal::from(45),
            status,
            owner_name: None,
            owner_phone: None,
            handover_date: None,
            price: BigDecimal::from(450_000_000),
            bedrooms: 2,
            bathrooms: 1,
            block_unit: "A-03".to_string(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn resident(house_id: Uuid, user_id: Option<Uuid>) -> Resident {
        Resident {
            id: Uuid::new_v4(),
            house_id,
            user_id,
            name: "Sari".to_string(),
            phone: "081234567890".to_string(),
            email: None,
            address: None,
            move_in_date: None,
            move_out_date: None,
            status: ResidentStatus::Active,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn payment(resident_user_id: Option<Uuid>) -> Payment {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        Payment {
            id: Uuid::new_v4(),
            house_id: Uuid::new_v4(),
            resident_id: resident_user_id.map(|_| Uuid::new_v4()),
            payment_date: date,
            amount: BigDecimal::from(250_000),
            payment_type: "maintenance".to_string(),
            status: PaymentStatus::Pending,
            due_date: date,
            description: None,
            notes: None,
            house_block_unit: None,
            resident_name: None,
            resident_user_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn complaint(
        resident_id: Uuid,
        resident_user_id: Option<Uuid>,
        status: ComplaintStatus,
    ) -> Complaint {
        Complaint {
            id: Uuid::new_v4(),
            house_id: Uuid::new_v4(),
            resident_id,
            assigned_to: None,
            title: "Leaking roof".to_string(),
            description: "Water drips in the kitchen".to_string(),
            status,
            priority: ComplaintPriority::High,
            category: None,
            attachments: None,
            response: None,
            resolved_at: None,
            house_block_unit: None,
            resident_name: None,
            resident_user_id,
            assigned_user_name: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    const ALL_ROLES: [UserRole; 4] = [
        UserRole::Administrator,
        UserRole::HousingManager,
        UserRole::SalesStaff,
        UserRole::Resident,
    ];

    const STAFF_ROLES: [UserRole; 3] = [
        UserRole::Administrator,
        UserRole::HousingManager,
        UserRole::SalesStaff,
    ];

    fn allowed(actor: &Actor, action: Action, subject: Subject<'_>) -> bool {
        can(actor, action, subject).is_allowed()
    }

    fn link() -> ResidentLink {
        ResidentLink {
            id: Uuid::new_v4(),
            house_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn every_role_may_list_every_kind() {
        let kinds = [
            EntityKind::House,
            EntityKind::Resident,
            EntityKind::Payment,
            EntityKind::Complaint,
        ];
        for role in ALL_ROLES {
            for kind in kinds {
                assert!(allowed(&staff(role), Action::List, Subject::Kind(kind)));
            }
        }
    }

    #[test]
    fn house_create_and_delete_are_admin_only() {
        let target = house(HouseStatus::Available);
        for role in ALL_ROLES {
            let actor = staff(role);
            let expected = role == UserRole::Administrator;
            assert_eq!(
                allowed(&actor, Action::Create, Subject::Kind(EntityKind::House)),
                expected
            );
            assert_eq!(
                allowed(&actor, Action::Delete, Subject::House(&target)),
                expected
            );
        }
    }

    #[test]
    fn house_update_for_admin_and_housing_manager() {
        let target = house(HouseStatus::Occupied);
        let update = |actor: &Actor| allowed(actor, Action::Update, Subject::House(&target));

        assert!(update(&staff(UserRole::Administrator)));
        assert!(update(&staff(UserRole::HousingManager)));
        assert!(!update(&staff(UserRole::SalesStaff)));
        assert!(!update(&resident_actor(None)));
    }

    #[test]
    fn resident_sees_only_own_house() {
        let own = house(HouseStatus::Occupied);
        let other = house(HouseStatus::Occupied);
        let actor = resident_actor(Some(ResidentLink {
            id: Uuid::new_v4(),
            house_id: own.id,
        }));

        assert_eq!(
            can(&actor, Action::View, Subject::House(&own)),
            Decision::Allow
        );
        assert_eq!(
            can(&actor, Action::View, Subject::House(&other)),
            Decision::Deny("You can only view your own house.".to_string())
        );
    }

    #[test]
    fn unlinked_resident_sees_no_house() {
        let target = house(HouseStatus::Available);
        assert!(!allowed(
            &resident_actor(None),
            Action::View,
            Subject::House(&target)
        ));
    }

    #[test]
    fn staff_roles_view_any_house() {
        let target = house(HouseStatus::Sold);
        for role in STAFF_ROLES {
            assert!(allowed(&staff(role), Action::View, Subject::House(&target)));
        }
    }

    #[test]
    fn sales_staff_house_scope_is_available_only() {
        assert_eq!(
            list_scope(&staff(UserRole::SalesStaff), EntityKind::House),
            ListScope::HouseStatus(HouseStatus::Available)
        );
        for role in [UserRole::Administrator, UserRole::HousingManager] {
            assert_eq!(
                list_scope(&staff(role), EntityKind::House),
                ListScope::Unrestricted
            );
        }
    }

    #[test]
    fn resident_list_scopes() {
        let link = link();
        let actor = resident_actor(Some(link));

        assert_eq!(
            list_scope(&actor, EntityKind::Resident),
            ListScope::OwnRecord(Some(link.id))
        );
        assert_eq!(
            list_scope(&actor, EntityKind::Payment),
            ListScope::OwnedByUser(actor.user_id)
        );
        assert_eq!(
            list_scope(&actor, EntityKind::Complaint),
            ListScope::OwnedByUser(actor.user_id)
        );
        assert_eq!(
            list_scope(&resident_actor(None), EntityKind::Resident),
            ListScope::OwnRecord(None)
        );
    }

    #[test]
    fn resident_management_is_for_staff_managers() {
        let target = resident(Uuid::new_v4(), None);
        for role in ALL_ROLES {
            let actor = staff(role);
            let expected = role.is_staff_manager();
            assert_eq!(
                allowed(&actor, Action::Create, Subject::Kind(EntityKind::Resident)),
                expected
            );
            assert_eq!(
                allowed(&actor, Action::Update, Subject::Resident(&target)),
                expected
            );
            assert_eq!(
                allowed(&actor, Action::Delete, Subject::Resident(&target)),
                expected
            );
        }
    }

    #[test]
    fn resident_views_only_own_record() {
        let own = resident(Uuid::new_v4(), None);
        let other = resident(own.house_id, None);
        let actor = resident_actor(Some(ResidentLink::from(&own)));

        assert!(allowed(&actor, Action::View, Subject::Resident(&own)));
        assert!(!allowed(&actor, Action::View, Subject::Resident(&other)));
        assert!(allowed(
            &staff(UserRole::SalesStaff),
            Action::View,
            Subject::Resident(&other)
        ));
    }

    #[test]
    fn payments_are_written_by_non_residents() {
        let target = payment(None);
        for role in ALL_ROLES {
            let actor = staff(role);
            let expected = !role.is_resident();
            assert_eq!(
                allowed(&actor, Action::Create, Subject::Kind(EntityKind::Payment)),
                expected
            );
            assert_eq!(
                allowed(&actor, Action::Update, Subject::Payment(&target)),
                expected
            );
            assert_eq!(
                allowed(&actor, Action::Delete, Subject::Payment(&target)),
                expected
            );
        }
    }

    #[test]
    fn resident_views_only_own_payments() {
        let actor = resident_actor(Some(link()));
        let own = payment(Some(actor.user_id));
        let foreign = payment(Some(Uuid::new_v4()));

        assert!(allowed(&actor, Action::View, Subject::Payment(&own)));
        assert!(!allowed(&actor, Action::View, Subject::Payment(&foreign)));
        // house-level payment with no resident attached
        assert!(!allowed(&actor, Action::View, Subject::Payment(&payment(None))));
    }

    #[test]
    fn complaint_view_scenario() {
        let own_record = Uuid::new_v4();
        let actor = resident_actor(Some(ResidentLink {
            id: own_record,
            house_id: Uuid::new_v4(),
        }));

        let mine = complaint(own_record, Some(actor.user_id), ComplaintStatus::New);
        let theirs = complaint(Uuid::new_v4(), Some(Uuid::new_v4()), ComplaintStatus::New);

        assert_eq!(
            can(&actor, Action::View, Subject::Complaint(&mine)),
            Decision::Allow
        );
        assert!(!allowed(&actor, Action::View, Subject::Complaint(&theirs)));
    }

    #[test]
    fn complaint_create_needs_linked_resident() {
        let filing = Subject::Kind(EntityKind::Complaint);

        assert!(allowed(&resident_actor(Some(link())), Action::Create, filing));
        assert_eq!(
            can(&resident_actor(None), Action::Create, filing),
            Decision::Deny(
                "You must be registered as a resident to file a complaint.".to_string()
            )
        );

        for role in STAFF_ROLES {
            assert!(!allowed(&staff(role), Action::Create, filing));
        }
    }

    #[test]
    fn resident_edits_own_complaint_only_while_new() {
        let own_record = Uuid::new_v4();
        let actor = resident_actor(Some(ResidentLink {
            id: own_record,
            house_id: Uuid::new_v4(),
        }));

        let fresh = complaint(own_record, Some(actor.user_id), ComplaintStatus::New);
        assert!(allowed(&actor, Action::Update, Subject::Complaint(&fresh)));

        let in_progress = complaint(
            own_record,
            Some(actor.user_id),
            ComplaintStatus::InProgress,
        );
        assert_eq!(
            can(&actor, Action::Update, Subject::Complaint(&in_progress)),
            Decision::Deny(
                "You can only edit your own complaints while they are still new.".to_string()
            )
        );

        let foreign = complaint(Uuid::new_v4(), Some(Uuid::new_v4()), ComplaintStatus::New);
        assert!(!allowed(&actor, Action::Update, Subject::Complaint(&foreign)));
    }

    #[test]
    fn staff_complaint_update_and_delete() {
        let target = complaint(Uuid::new_v4(), None, ComplaintStatus::Completed);
        let subject = Subject::Complaint(&target);

        assert!(allowed(&staff(UserRole::Administrator), Action::Update, subject));
        assert!(allowed(&staff(UserRole::HousingManager), Action::Delete, subject));
        assert!(!allowed(&staff(UserRole::SalesStaff), Action::Update, subject));
        assert!(!allowed(&staff(UserRole::SalesStaff), Action::Delete, subject));

        let resident = resident_actor(Some(ResidentLink {
            id: target.resident_id,
            house_id: target.house_id,
        }));
        assert!(!allowed(&resident, Action::Delete, subject));
    }

    #[test]
    fn instance_actions_need_a_record() {
        let decision = can(
            &staff(UserRole::Administrator),
            Action::View,
            Subject::Kind(EntityKind::House),
        );
        assert_eq!(
            decision,
            Decision::Deny("This action requires a specific house record.".to_string())
        );
    }

    #[test]
    fn residents_cannot_touch_staff_fields() {
        let actor = resident_actor(Some(link()));

        assert!(check_complaint_fields(&actor, &[]).is_allowed());
        assert_eq!(
            check_complaint_fields(&actor, &["status", "assigned_to"]),
            Decision::Deny(
                "Residents cannot change status, assigned_to on a complaint.".to_string()
            )
        );
        assert!(
            check_complaint_fields(&staff(UserRole::HousingManager), &COMPLAINT_STAFF_FIELDS)
                .is_allowed()
        );
    }

    #[test]
    fn deny_becomes_authorization_error() {
        let err = Decision::Deny("nope".to_string()).into_result().unwrap_err();
        assert!(matches!(err, ServiceError::AuthorizationDenied(reason) if reason == "nope"));
        assert!(Decision::Allow.into_result().is_ok());
    }
}
