use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "features")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
    pub name: String,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::subscription_plan::Entity> for Entity {
    fn to() -> RelationDef {
        super::plan_feature::Relation::SubscriptionPlan.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::plan_feature::Relation::Feature.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

super::base::soft_delete_entity!();

#[derive(Debug, Deserialize)]
pub struct NewFeature {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl NewFeature {
    pub fn into_active_model(self) -> ActiveModel {
        let now = chrono::Utc::now();

        ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            name: Set(self.name),
            description: Set(self.description),
            ..Default::default()
        }
    }
}
