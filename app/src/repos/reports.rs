use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, QueryFilter, QueryOrder};

use crate::{
    models::{
        organization::Entity as OrganizationEntity,
        report::{self, Entity as ReportEntity, Model as Report, NewReport, ReportChanges},
    },
    repos::scope::{find_live, scoped, soft_delete},
};

pub struct ReportsRepo {
    db: DatabaseConnection,
}

impl ReportsRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new_report: NewReport, creator: i32) -> Result<Report, DbErr> {
        find_live::<OrganizationEntity, _>(&self.db, new_report.organization_id).await?;

        new_report.into_active_model(creator).insert(&self.db).await
    }

    pub async fn get(&self, id: i32) -> Result<Report, DbErr> {
        find_live::<ReportEntity, _>(&self.db, id).await
    }

    pub async fn update(&self, id: i32, changes: ReportChanges) -> Result<Report, DbErr> {
        let report = self.get(id).await?;
        changes.apply(report).update(&self.db).await
    }

    pub async fn soft_delete(&self, id: i32) -> Result<(), DbErr> {
        soft_delete::<ReportEntity, _>(&self.db, id).await
    }

    pub async fn list_for_organization(
        &self,
        organization_id: i32,
        include_deleted: bool,
    ) -> Result<Vec<Report>, DbErr> {
        scoped::<ReportEntity>(include_deleted)
            .filter(report::Column::OrganizationId.eq(organization_id))
            .order_by_asc(report::Column::Id)
            .all(&self.db)
            .await
    }
}
