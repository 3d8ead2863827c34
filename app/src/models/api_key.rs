use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};

use super::base::StringList;
use crate::services::credentials::{random_token, CredentialError};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "api_keys")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
    pub user_id: i32,
    pub organization_id: i32,
    #[sea_orm(unique)]
    #[serde(skip_serializing)]
    pub key: String,
    pub name: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub permissions: StringList,
    pub expires_at: Option<DateTimeUtc>,
    pub last_used_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::organization::Entity",
        from = "Column::OrganizationId",
        to = "super::organization::Column::Id",
        on_delete = "Cascade"
    )]
    Organization,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

super::base::soft_delete_entity!();

impl Model {
    pub fn is_expired(&self, now: DateTimeUtc) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

/// Response for a freshly created key, the only time the secret is returned.
#[derive(Debug, Serialize)]
pub struct IssuedApiKey {
    #[serde(flatten)]
    pub api_key: Model,
    pub key: String,
}

impl From<Model> for IssuedApiKey {
    fn from(api_key: Model) -> Self {
        let key = api_key.key.clone();
        Self { api_key, key }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewApiKey {
    pub organization_id: i32,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub expires_at: Option<DateTimeUtc>,
}

impl NewApiKey {
    /// Generates the key. Uniqueness is left to the `api_keys.key` index.
    pub fn into_active_model(self, owner: i32) -> Result<ActiveModel, CredentialError> {
        let key = random_token()?;
        let now = chrono::Utc::now();

        Ok(ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            user_id: Set(owner),
            organization_id: Set(self.organization_id),
            key: Set(key),
            name: Set(self.name),
            permissions: Set(self.permissions.into()),
            expires_at: Set(self.expires_at),
            last_used_at: Set(None),
            ..Default::default()
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiKeyChanges {
    pub name: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub expires_at: Option<DateTimeUtc>,
    pub last_used_at: Option<DateTimeUtc>,
}

impl ApiKeyChanges {
    pub fn apply(self, api_key: Model) -> ActiveModel {
        let mut active: ActiveModel = api_key.into();
        if let Some(name) = self.name {
            active.name = Set(name);
        }
        if let Some(permissions) = self.permissions {
            active.permissions = Set(permissions.into());
        }
        if let Some(expires_at) = self.expires_at {
            active.expires_at = Set(Some(expires_at));
        }
        if let Some(last_used_at) = self.last_used_at {
            active.last_used_at = Set(Some(last_used_at));
        }
        active.updated_at = Set(chrono::Utc::now());
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn new_key() -> NewApiKey {
        NewApiKey {
            organization_id: 1,
            name: "ci".to_string(),
            permissions: vec!["reports:read".to_string()],
            expires_at: None,
        }
    }

    #[test]
    fn keys_generated_back_to_back_differ() {
        let first = new_key().into_active_model(9).unwrap().key.unwrap();
        let second = new_key().into_active_model(9).unwrap().key.unwrap();

        assert_eq!(first.len(), 43);
        assert_ne!(first, second);
    }

    #[test]
    fn creation_leaves_usage_to_the_caller() {
        let active = new_key().into_active_model(9).unwrap();

        assert_eq!(active.last_used_at.unwrap(), None);
        assert_eq!(active.user_id.unwrap(), 9);
        assert_eq!(
            active.permissions.unwrap(),
            StringList(vec!["reports:read".to_string()])
        );
    }

    fn stored_key() -> Model {
        let now = Utc::now();
        Model {
            id: 1,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            user_id: 1,
            organization_id: 1,
            key: "secret-value".to_string(),
            name: "ci".to_string(),
            permissions: StringList::default(),
            expires_at: None,
            last_used_at: None,
        }
    }

    #[test]
    fn stored_keys_never_serialize_the_secret() {
        let json = serde_json::to_value(stored_key()).unwrap();

        assert!(json.get("key").is_none());
        assert_eq!(json["name"], "ci");
    }

    #[test]
    fn issued_keys_carry_the_secret_once() {
        let json = serde_json::to_value(IssuedApiKey::from(stored_key())).unwrap();

        assert_eq!(json["key"], "secret-value");
        assert_eq!(json["id"], 1);
    }

    #[test]
    fn expiry_is_inclusive() {
        let mut key = stored_key();
        let now = key.created_at;
        assert!(!key.is_expired(now));

        key.expires_at = Some(now);
        assert!(key.is_expired(now));

        key.expires_at = Some(now + Duration::minutes(5));
        assert!(!key.is_expired(now));
    }
}
