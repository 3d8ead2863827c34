//! Activity entries are append-only, like audit entries.

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, QueryFilter, QueryOrder};

use crate::{
    models::activity_log::{self, Entity as ActivityLogEntity, Model as ActivityLog, NewActivityLog},
    repos::scope::{find_live, live},
};

pub struct ActivityLogsRepo {
    db: DatabaseConnection,
}

impl ActivityLogsRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn append(&self, entry: NewActivityLog, actor: i32) -> Result<ActivityLog, DbErr> {
        entry.into_active_model(actor).insert(&self.db).await
    }

    pub async fn get(&self, id: i32) -> Result<ActivityLog, DbErr> {
        find_live::<ActivityLogEntity, _>(&self.db, id).await
    }

    pub async fn list_for_organization(
        &self,
        organization_id: i32,
    ) -> Result<Vec<ActivityLog>, DbErr> {
        live::<ActivityLogEntity>()
            .filter(activity_log::Column::OrganizationId.eq(organization_id))
            .order_by_asc(activity_log::Column::Timestamp)
            .all(&self.db)
            .await
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<ActivityLog>, DbErr> {
        live::<ActivityLogEntity>()
            .filter(activity_log::Column::UserId.eq(user_id))
            .order_by_asc(activity_log::Column::Timestamp)
            .all(&self.db)
            .await
    }
}
