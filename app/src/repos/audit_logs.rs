//! Audit entries are append-only: there is no update or delete here.

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, QueryFilter, QueryOrder};

use crate::{
    models::audit_log::{self, Entity as AuditLogEntity, Model as AuditLog, NewAuditLog},
    repos::scope::{find_live, live},
};

pub struct AuditLogsRepo {
    db: DatabaseConnection,
}

impl AuditLogsRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn append(&self, entry: NewAuditLog, actor: i32) -> Result<AuditLog, DbErr> {
        entry.into_active_model(actor).insert(&self.db).await
    }

    pub async fn get(&self, id: i32) -> Result<AuditLog, DbErr> {
        find_live::<AuditLogEntity, _>(&self.db, id).await
    }

    pub async fn list_for_organization(&self, organization_id: i32) -> Result<Vec<AuditLog>, DbErr> {
        live::<AuditLogEntity>()
            .filter(audit_log::Column::OrganizationId.eq(organization_id))
            .order_by_asc(audit_log::Column::Timestamp)
            .order_by_asc(audit_log::Column::Id)
            .all(&self.db)
            .await
    }
}
