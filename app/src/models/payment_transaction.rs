//! Billing events. Rows are written once and never updated.

use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "payment_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
    pub subscription_id: i32,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub gateway: String,
    pub gateway_id: String,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subscription::Entity",
        from = "Column::SubscriptionId",
        to = "super::subscription::Column::Id",
        on_delete = "Cascade"
    )]
    Subscription,
}

impl Related<super::subscription::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subscription.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

super::base::soft_delete_entity!();

#[derive(Debug, Deserialize)]
pub struct NewPaymentTransaction {
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub gateway: String,
    pub gateway_id: String,
    #[serde(default)]
    pub timestamp: Option<DateTimeUtc>,
}

impl NewPaymentTransaction {
    pub fn into_active_model(self, subscription_id: i32) -> ActiveModel {
        let now = chrono::Utc::now();

        ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            subscription_id: Set(subscription_id),
            amount: Set(self.amount),
            currency: Set(self.currency),
            status: Set(self.status),
            gateway: Set(self.gateway),
            gateway_id: Set(self.gateway_id),
            timestamp: Set(self.timestamp.unwrap_or(now)),
            ..Default::default()
        }
    }
}
