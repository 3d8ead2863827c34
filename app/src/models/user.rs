use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};

use crate::services::credentials::{random_token, seal_password, CredentialError};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub verification_token: Option<String>,
    pub verified: bool,
    pub locale: String,
    pub timezone: String,
    pub language: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::seat::Entity")]
    Seat,
    #[sea_orm(has_many = "super::api_key::Entity")]
    ApiKey,
    #[sea_orm(has_one = "super::notification_preference::Entity")]
    NotificationPreference,
}

impl Related<super::seat::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seat.def()
    }
}

impl Related<super::api_key::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ApiKey.def()
    }
}

impl Related<super::notification_preference::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NotificationPreference.def()
    }
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_role::Relation::Role.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_role::Relation::User.def().rev())
    }
}

impl Related<super::permission::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_permission::Relation::Permission.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_permission::Relation::User.def().rev())
    }
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_organization::Relation::Organization.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_organization::Relation::User.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

super::base::soft_delete_entity!();

/// Sign-up payload. The plaintext password only lives here and is consumed
/// by [`NewUser::into_active_model`].
#[derive(Deserialize)]
pub struct NewUser {
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub locale: String,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub language: String,
}

impl NewUser {
    /// Hashes the password, clears the plaintext and issues a verification
    /// token. Every user insert goes through here.
    pub fn into_active_model(mut self, cost: u32) -> Result<ActiveModel, CredentialError> {
        let password_hash = seal_password(&mut self.password, cost)?.unwrap_or_default();
        let verification_token = random_token()?;
        let now = chrono::Utc::now();

        Ok(ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            email: Set(self.email),
            password_hash: Set(password_hash),
            name: Set(self.name),
            verification_token: Set(Some(verification_token)),
            verified: Set(false),
            locale: Set(self.locale),
            timezone: Set(self.timezone),
            language: Set(self.language),
            ..Default::default()
        })
    }
}

#[derive(Default, Deserialize)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub locale: Option<String>,
    pub timezone: Option<String>,
    pub language: Option<String>,
}

impl UserChanges {
    /// Pre-update step for every user write. The stored hash is only
    /// replaced when a non-empty password is supplied.
    pub fn apply(self, user: Model, cost: u32) -> Result<ActiveModel, CredentialError> {
        let mut active: ActiveModel = user.into();

        if let Some(mut password) = self.password {
            if let Some(hash) = seal_password(&mut password, cost)? {
                active.password_hash = Set(hash);
            }
        }
        if let Some(email) = self.email {
            active.email = Set(email);
        }
        if let Some(name) = self.name {
            active.name = Set(name);
        }
        if let Some(locale) = self.locale {
            active.locale = Set(locale);
        }
        if let Some(timezone) = self.timezone {
            active.timezone = Set(timezone);
        }
        if let Some(language) = self.language {
            active.language = Set(language);
        }
        active.updated_at = Set(chrono::Utc::now());

        Ok(active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::credentials::verify_password;

    const COST: u32 = 4;

    fn new_user(password: &str) -> NewUser {
        NewUser {
            email: "ada@example.com".to_string(),
            password: password.to_string(),
            name: "Ada".to_string(),
            locale: String::new(),
            timezone: String::new(),
            language: String::new(),
        }
    }

    fn stored(active: ActiveModel) -> Model {
        Model {
            id: 1,
            created_at: active.created_at.unwrap(),
            updated_at: active.updated_at.unwrap(),
            deleted_at: None,
            email: active.email.unwrap(),
            password_hash: active.password_hash.unwrap(),
            name: active.name.unwrap(),
            verification_token: active.verification_token.unwrap(),
            verified: active.verified.unwrap(),
            locale: active.locale.unwrap(),
            timezone: active.timezone.unwrap(),
            language: active.language.unwrap(),
        }
    }

    #[test]
    fn create_stores_only_a_verifiable_hash() {
        let user = stored(new_user("hunter22").into_active_model(COST).unwrap());

        assert_ne!(user.password_hash, "hunter22");
        assert!(verify_password("hunter22", &user.password_hash));
        assert!(!verify_password("hunter23", &user.password_hash));
    }

    #[test]
    fn create_issues_distinct_verification_tokens() {
        let first = stored(new_user("pw").into_active_model(COST).unwrap());
        let second = stored(new_user("pw").into_active_model(COST).unwrap());

        let first_token = first.verification_token.unwrap();
        assert_eq!(first_token.len(), 43);
        assert_ne!(Some(first_token), second.verification_token);
        assert!(!first.verified);
    }

    #[test]
    fn create_without_password_leaves_hash_empty() {
        let user = stored(new_user("").into_active_model(COST).unwrap());
        assert!(user.password_hash.is_empty());
    }

    #[test]
    fn create_rejects_overlong_password() {
        let result = new_user(&"x".repeat(100)).into_active_model(COST);
        assert!(matches!(result, Err(CredentialError::Hash(_))));
    }

    #[test]
    fn update_without_password_keeps_hash() {
        let user = stored(new_user("hunter22").into_active_model(COST).unwrap());
        let before = user.password_hash.clone();

        let changes = UserChanges {
            name: Some("Ada Lovelace".to_string()),
            ..Default::default()
        };
        let active = changes.apply(user, COST).unwrap();

        assert_eq!(active.password_hash.unwrap(), before);
        assert_eq!(active.name.unwrap(), "Ada Lovelace");
    }

    #[test]
    fn update_with_empty_password_keeps_hash() {
        let user = stored(new_user("hunter22").into_active_model(COST).unwrap());
        let before = user.password_hash.clone();

        let changes = UserChanges {
            password: Some(String::new()),
            ..Default::default()
        };
        let active = changes.apply(user, COST).unwrap();

        assert_eq!(active.password_hash.unwrap(), before);
    }

    #[test]
    fn update_with_password_rehashes() {
        let user = stored(new_user("hunter22").into_active_model(COST).unwrap());
        let before = user.password_hash.clone();

        let changes = UserChanges {
            password: Some("correct horse".to_string()),
            ..Default::default()
        };
        let after = changes.apply(user, COST).unwrap().password_hash.unwrap();

        assert_ne!(after, before);
        assert!(verify_password("correct horse", &after));
    }
}
