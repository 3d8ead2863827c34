use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "organizations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
    pub name: String,
    pub logo_url: String,
    pub theme_color: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::domain::Entity")]
    Domain,
    #[sea_orm(has_many = "super::seat::Entity")]
    Seat,
    #[sea_orm(has_many = "super::subscription::Entity")]
    Subscription,
}

impl Related<super::domain::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Domain.def()
    }
}

impl Related<super::seat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seat.def()
    }
}

impl Related<super::subscription::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subscription.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_organization::Relation::User.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_organization::Relation::Organization.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

super::base::soft_delete_entity!();

/// Branding settings, stored as columns on the organization row.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSettings {
    #[serde(default)]
    pub logo_url: String,
    #[serde(default)]
    pub theme_color: String,
}

impl Model {
    pub fn settings(&self) -> OrganizationSettings {
        OrganizationSettings {
            logo_url: self.logo_url.clone(),
            theme_color: self.theme_color.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewOrganization {
    pub name: String,
    #[serde(default)]
    pub settings: OrganizationSettings,
}

impl NewOrganization {
    pub fn into_active_model(self) -> ActiveModel {
        let now = chrono::Utc::now();

        ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            name: Set(self.name),
            logo_url: Set(self.settings.logo_url),
            theme_color: Set(self.settings.theme_color),
            ..Default::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OrganizationChanges {
    pub name: Option<String>,
    pub settings: Option<OrganizationSettings>,
}

impl OrganizationChanges {
    pub fn apply(self, organization: Model) -> ActiveModel {
        let mut active: ActiveModel = organization.into();
        if let Some(name) = self.name {
            active.name = Set(name);
        }
        if let Some(settings) = self.settings {
            active.logo_url = Set(settings.logo_url);
            active.theme_color = Set(settings.theme_color);
        }
        active.updated_at = Set(chrono::Utc::now());
        active
    }
}
