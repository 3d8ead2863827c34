//! Append-only user activity feed.

use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "activity_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
    pub organization_id: i32,
    pub user_id: i32,
    pub activity_type: String,
    pub timestamp: DateTimeUtc,
    #[sea_orm(column_type = "JsonBinary")]
    pub metadata: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

super::base::soft_delete_entity!();

#[derive(Debug, Deserialize)]
pub struct NewActivityLog {
    pub organization_id: i32,
    pub activity_type: String,
    #[serde(default = "empty_metadata")]
    pub metadata: Json,
}

fn empty_metadata() -> Json {
    Json::Object(Default::default())
}

impl NewActivityLog {
    pub fn into_active_model(self, actor: i32) -> ActiveModel {
        let now = chrono::Utc::now();

        ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            organization_id: Set(self.organization_id),
            user_id: Set(actor),
            activity_type: Set(self.activity_type),
            timestamp: Set(now),
            metadata: Set(self.metadata),
            ..Default::default()
        }
    }
}
