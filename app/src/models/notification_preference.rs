use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "notification_preferences")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
    #[sea_orm(unique)]
    pub user_id: i32,
    pub email_enabled: bool,
    pub sms_enabled: bool,
    pub in_app_enabled: bool,
    pub billing_emails: bool,
    pub product_emails: bool,
    pub marketing_emails: bool,
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
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

super::base::soft_delete_entity!();

/// Row created alongside every new user: transactional mail on,
/// SMS and marketing off.
pub fn defaults_for(user_id: i32) -> ActiveModel {
    let now = chrono::Utc::now();

    ActiveModel {
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        user_id: Set(user_id),
        email_enabled: Set(true),
        sms_enabled: Set(false),
        in_app_enabled: Set(true),
        billing_emails: Set(true),
        product_emails: Set(true),
        marketing_emails: Set(false),
        ..Default::default()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PreferenceChanges {
    pub email_enabled: Option<bool>,
    pub sms_enabled: Option<bool>,
    pub in_app_enabled: Option<bool>,
    pub billing_emails: Option<bool>,
    pub product_emails: Option<bool>,
    pub marketing_emails: Option<bool>,
}

impl PreferenceChanges {
    pub fn apply(self, preferences: Model) -> ActiveModel {
        let mut active: ActiveModel = preferences.into();
        let flags = [
            (&mut active.email_enabled, self.email_enabled),
            (&mut active.sms_enabled, self.sms_enabled),
            (&mut active.in_app_enabled, self.in_app_enabled),
            (&mut active.billing_emails, self.billing_emails),
            (&mut active.product_emails, self.product_emails),
            (&mut active.marketing_emails, self.marketing_emails),
        ];
        for (field, value) in flags {
            if let Some(value) = value {
                *field = Set(value);
            }
        }
        active.updated_at = Set(chrono::Utc::now());
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_supplied_flags_change() {
        let now = chrono::Utc::now();
        let current = Model {
            id: 1,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            user_id: 4,
            email_enabled: true,
            sms_enabled: false,
            in_app_enabled: true,
            billing_emails: true,
            product_emails: true,
            marketing_emails: false,
        };

        let active = PreferenceChanges {
            marketing_emails: Some(true),
            email_enabled: Some(false),
            ..Default::default()
        }
        .apply(current);

        assert!(active.marketing_emails.unwrap());
        assert!(!active.email_enabled.unwrap());
        assert!(!active.sms_enabled.unwrap());
        assert!(active.billing_emails.unwrap());
    }
}
