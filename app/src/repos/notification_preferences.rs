use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, QueryFilter};

use crate::{
    models::{
        notification_preference::{
            self, defaults_for, Entity as PreferenceEntity, Model as NotificationPreference,
            PreferenceChanges,
        },
        user::Entity as UserEntity,
    },
    repos::scope::{find_live, live},
};

pub struct NotificationPreferencesRepo {
    db: DatabaseConnection,
}

impl NotificationPreferencesRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Users created before preferences existed get the defaults on first read.
    pub async fn get_for_user(&self, user_id: i32) -> Result<NotificationPreference, DbErr> {
        find_live::<UserEntity, _>(&self.db, user_id).await?;

        let preferences = live::<PreferenceEntity>()
            .filter(notification_preference::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;

        match preferences {
            Some(p) => Ok(p),
            None => defaults_for(user_id).insert(&self.db).await,
        }
    }

    pub async fn update_for_user(
        &self,
        user_id: i32,
        changes: PreferenceChanges,
    ) -> Result<NotificationPreference, DbErr> {
        let preferences = self.get_for_user(user_id).await?;
        changes.apply(preferences).update(&self.db).await
    }
}
