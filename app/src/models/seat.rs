use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    #[sea_orm(string_value = "invited")]
    Invited,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

impl SeatStatus {
    /// Seats move invited → active → inactive. An invite can be withdrawn
    /// and an inactive seat can be reactivated; nothing returns to invited.
    pub fn can_transition_to(self, next: SeatStatus) -> bool {
        use SeatStatus::*;

        matches!(
            (self, next),
            (Invited, Invited)
                | (Invited, Active)
                | (Invited, Inactive)
                | (Active, Active)
                | (Active, Inactive)
                | (Inactive, Inactive)
                | (Inactive, Active)
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Seat cannot move from {from:?} to {to:?}")]
pub struct SeatTransitionError {
    pub from: SeatStatus,
    pub to: SeatStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "seats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
    pub organization_id: i32,
    pub user_id: i32,
    pub status: SeatStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organization::Entity",
        from = "Column::OrganizationId",
        to = "super::organization::Column::Id",
        on_delete = "Cascade"
    )]
    Organization,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        super::seat_role::Relation::Role.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::seat_role::Relation::Seat.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

super::base::soft_delete_entity!();

#[derive(Debug, Deserialize)]
pub struct NewSeat {
    pub organization_id: i32,
    pub user_id: i32,
    #[serde(default)]
    pub status: Option<SeatStatus>,
}

impl NewSeat {
    pub fn into_active_model(self) -> ActiveModel {
        let now = chrono::Utc::now();

        ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            organization_id: Set(self.organization_id),
            user_id: Set(self.user_id),
            status: Set(self.status.unwrap_or(SeatStatus::Invited)),
            ..Default::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SeatChanges {
    pub status: Option<SeatStatus>,
}

impl SeatChanges {
    pub fn apply(self, seat: Model) -> Result<ActiveModel, SeatTransitionError> {
        let current = seat.status;
        let mut active: ActiveModel = seat.into();

        if let Some(next) = self.status {
            if !current.can_transition_to(next) {
                return Err(SeatTransitionError {
                    from: current,
                    to: next,
                });
            }
            active.status = Set(next);
        }
        active.updated_at = Set(chrono::Utc::now());

        Ok(active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(status: SeatStatus) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: 7,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            organization_id: 1,
            user_id: 2,
            status,
        }
    }

    #[test]
    fn new_seats_start_invited() {
        let active = NewSeat {
            organization_id: 1,
            user_id: 2,
            status: None,
        }
        .into_active_model();

        assert_eq!(active.status.unwrap(), SeatStatus::Invited);
    }

    #[test]
    fn lifecycle_moves_forward() {
        assert!(SeatStatus::Invited.can_transition_to(SeatStatus::Active));
        assert!(SeatStatus::Active.can_transition_to(SeatStatus::Inactive));
        assert!(SeatStatus::Inactive.can_transition_to(SeatStatus::Active));
    }

    #[test]
    fn seats_never_return_to_invited() {
        let changes = SeatChanges {
            status: Some(SeatStatus::Invited),
        };
        let err = changes.apply(seat(SeatStatus::Active)).unwrap_err();

        assert_eq!(
            err,
            SeatTransitionError {
                from: SeatStatus::Active,
                to: SeatStatus::Invited,
            }
        );
        assert!(!SeatStatus::Inactive.can_transition_to(SeatStatus::Invited));
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&SeatStatus::Inactive).unwrap();
        assert_eq!(json, "\"inactive\"");
    }
}
