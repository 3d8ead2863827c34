//! Append-only record of state-changing actions. Rows reference users,
//! organizations and resources by plain ids, so they survive the soft
//! deletion of whatever they describe.

use std::collections::BTreeMap;

use sea_orm::{entity::prelude::*, ActiveValue::Set, FromJsonQueryResult};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldChange {
    #[serde(default)]
    pub before: Json,
    #[serde(default)]
    pub after: Json,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDiff {
    pub fields: BTreeMap<String, FieldChange>,
}

/// Payload of an audit entry: a per-field diff when the shape is known,
/// otherwise whatever JSON the caller supplied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(untagged)]
pub enum AuditChanges {
    Fields(FieldDiff),
    Opaque(Json),
}

impl Default for AuditChanges {
    fn default() -> Self {
        Self::Fields(FieldDiff::default())
    }
}

impl AuditChanges {
    pub fn field(self, name: &str, before: impl Serialize, after: impl Serialize) -> Self {
        let change = FieldChange {
            before: serde_json::to_value(before).unwrap_or(Json::Null),
            after: serde_json::to_value(after).unwrap_or(Json::Null),
        };

        let mut diff = match self {
            Self::Fields(diff) => diff,
            Self::Opaque(_) => FieldDiff::default(),
        };
        diff.fields.insert(name.to_string(), change);
        Self::Fields(diff)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
    pub organization_id: i32,
    pub user_id: i32,
    pub action: String,
    pub resource_type: String,
    pub resource_id: i32,
    pub timestamp: DateTimeUtc,
    #[sea_orm(column_type = "JsonBinary")]
    pub changes: AuditChanges,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

super::base::soft_delete_entity!();

#[derive(Debug, Deserialize)]
pub struct NewAuditLog {
    pub organization_id: i32,
    pub action: String,
    pub resource_type: String,
    pub resource_id: i32,
    #[serde(default)]
    pub changes: AuditChanges,
}

impl NewAuditLog {
    /// `actor` is the authenticated user, never taken from the payload.
    pub fn into_active_model(self, actor: i32) -> ActiveModel {
        let now = chrono::Utc::now();

        ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            organization_id: Set(self.organization_id),
            user_id: Set(actor),
            action: Set(self.action),
            resource_type: Set(self.resource_type),
            resource_id: Set(self.resource_id),
            timestamp: Set(now),
            changes: Set(self.changes),
            ..Default::default()
        }
    }
}
