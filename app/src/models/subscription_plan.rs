use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "subscription_plans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub currency: String,
    pub interval: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::feature::Entity> for Entity {
    fn to() -> RelationDef {
        super::plan_feature::Relation::Feature.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::plan_feature::Relation::SubscriptionPlan.def().rev())
    }
}

impl Related<super::subscription::Entity> for Entity {
    fn to() -> RelationDef {
        super::subscription::Relation::SubscriptionPlan.def().rev()
    }
}

impl ActiveModelBehavior for ActiveModel {}

super::base::soft_delete_entity!();

#[derive(Debug, Deserialize)]
pub struct NewPlan {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub currency: String,
    pub interval: String,
}

impl NewPlan {
    pub fn into_active_model(self) -> ActiveModel {
        let now = chrono::Utc::now();

        ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            name: Set(self.name),
            description: Set(self.description),
            price: Set(self.price),
            currency: Set(self.currency),
            interval: Set(self.interval),
            ..Default::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PlanChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub interval: Option<String>,
}

impl PlanChanges {
    pub fn apply(self, plan: Model) -> ActiveModel {
        let mut active: ActiveModel = plan.into();
        if let Some(name) = self.name {
            active.name = Set(name);
        }
        if let Some(description) = self.description {
            active.description = Set(description);
        }
        if let Some(price) = self.price {
            active.price = Set(price);
        }
        if let Some(currency) = self.currency {
            active.currency = Set(currency);
        }
        if let Some(interval) = self.interval {
            active.interval = Set(interval);
        }
        active.updated_at = Set(chrono::Utc::now());
        active
    }
}
