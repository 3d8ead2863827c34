use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};

/// Role names the request gate compares token claims against.
pub const ADMIN_ROLE: &str = "admin";
pub const USER_ROLE: &str = "user";

pub fn is_reserved(name: &str) -> bool {
    name == ADMIN_ROLE || name == USER_ROLE
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::permission::Entity> for Entity {
    fn to() -> RelationDef {
        super::role_permission::Relation::Permission.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::role_permission::Relation::Role.def().rev())
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_role::Relation::User.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_role::Relation::Role.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

super::base::soft_delete_entity!();

#[derive(Debug, Deserialize)]
pub struct NewRole {
    pub name: String,
}

impl NewRole {
    pub fn into_active_model(self) -> ActiveModel {
        let now = chrono::Utc::now();

        ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            name: Set(self.name),
            ..Default::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RoleChanges {
    pub name: Option<String>,
}

impl RoleChanges {
    pub fn apply(self, role: Model) -> ActiveModel {
        let mut active: ActiveModel = role.into();
        if let Some(name) = self.name {
            active.name = Set(name);
        }
        active.updated_at = Set(chrono::Utc::now());
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_and_user_are_reserved() {
        assert!(is_reserved("admin"));
        assert!(is_reserved("user"));
        assert!(!is_reserved("billing-manager"));
        assert!(!is_reserved("Admin"));
    }
}
