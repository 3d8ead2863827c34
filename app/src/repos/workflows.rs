use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, QueryFilter, QueryOrder};

use crate::{
    models::{
        organization::Entity as OrganizationEntity,
        workflow::{self, Entity as WorkflowEntity, Model as Workflow, NewWorkflow, WorkflowChanges},
    },
    repos::{
        scope::{find_live, scoped, soft_delete},
        WriteError,
    },
};

pub struct WorkflowsRepo {
    db: DatabaseConnection,
}

impl WorkflowsRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new_workflow: NewWorkflow, creator: i32) -> Result<Workflow, WriteError> {
        find_live::<OrganizationEntity, _>(&self.db, new_workflow.organization_id).await?;

        let workflow = new_workflow
            .into_active_model(creator)?
            .insert(&self.db)
            .await?;

        Ok(workflow)
    }

    pub async fn get(&self, id: i32) -> Result<Workflow, DbErr> {
        find_live::<WorkflowEntity, _>(&self.db, id).await
    }

    pub async fn update(&self, id: i32, changes: WorkflowChanges) -> Result<Workflow, WriteError> {
        let workflow = self.get(id).await?;
        let workflow = changes.apply(workflow)?.update(&self.db).await?;

        Ok(workflow)
    }

    pub async fn soft_delete(&self, id: i32) -> Result<(), DbErr> {
        soft_delete::<WorkflowEntity, _>(&self.db, id).await
    }

    pub async fn list_for_organization(
        &self,
        organization_id: i32,
        include_deleted: bool,
    ) -> Result<Vec<Workflow>, DbErr> {
        scoped::<WorkflowEntity>(include_deleted)
            .filter(workflow::Column::OrganizationId.eq(organization_id))
            .order_by_asc(workflow::Column::Id)
            .all(&self.db)
            .await
    }
}
