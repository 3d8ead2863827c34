use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};

use super::base::StringList;

/// Saved query definition delivered to `recipients` on `schedule`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
    pub organization_id: i32,
    pub creator_id: i32,
    pub name: String,
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub query: String,
    pub schedule: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub recipients: StringList,
    pub last_run_at: Option<DateTimeUtc>,
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
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

super::base::soft_delete_entity!();

#[derive(Debug, Deserialize)]
pub struct NewReport {
    pub organization_id: i32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub query: String,
    #[serde(default)]
    pub schedule: String,
    #[serde(default)]
    pub recipients: Vec<String>,
}

impl NewReport {
    pub fn into_active_model(self, creator: i32) -> ActiveModel {
        let now = chrono::Utc::now();

        ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            organization_id: Set(self.organization_id),
            creator_id: Set(creator),
            name: Set(self.name),
            description: Set(self.description),
            query: Set(self.query),
            schedule: Set(self.schedule),
            recipients: Set(self.recipients.into()),
            last_run_at: Set(None),
            ..Default::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub query: Option<String>,
    pub schedule: Option<String>,
    pub recipients: Option<Vec<String>>,
    pub last_run_at: Option<DateTimeUtc>,
}

impl ReportChanges {
    pub fn apply(self, report: Model) -> ActiveModel {
        let mut active: ActiveModel = report.into();
        if let Some(name) = self.name {
            active.name = Set(name);
        }
        if let Some(description) = self.description {
            active.description = Set(description);
        }
        if let Some(query) = self.query {
            active.query = Set(query);
        }
        if let Some(schedule) = self.schedule {
            active.schedule = Set(schedule);
        }
        if let Some(recipients) = self.recipients {
            active.recipients = Set(recipients.into());
        }
        if let Some(last_run_at) = self.last_run_at {
            active.last_run_at = Set(Some(last_run_at));
        }
        active.updated_at = Set(chrono::Utc::now());
        active
    }
}
