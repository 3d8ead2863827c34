use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, QueryFilter, QueryOrder};

use crate::{
    models::{
        api_key::{self, ApiKeyChanges, Entity as ApiKeyEntity, Model as ApiKey, NewApiKey},
        organization::Entity as OrganizationEntity,
    },
    repos::{
        scope::{find_live, scoped, soft_delete},
        WriteError,
    },
};

pub struct ApiKeysRepo {
    db: DatabaseConnection,
}

impl ApiKeysRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new_key: NewApiKey, owner: i32) -> Result<ApiKey, WriteError> {
        find_live::<OrganizationEntity, _>(&self.db, new_key.organization_id).await?;

        let key = new_key.into_active_model(owner)?.insert(&self.db).await?;

        Ok(key)
    }

    pub async fn get(&self, id: i32) -> Result<ApiKey, DbErr> {
        find_live::<ApiKeyEntity, _>(&self.db, id).await
    }

    pub async fn update(&self, id: i32, changes: ApiKeyChanges) -> Result<ApiKey, DbErr> {
        let key = self.get(id).await?;
        changes.apply(key).update(&self.db).await
    }

    pub async fn soft_delete(&self, id: i32) -> Result<(), DbErr> {
        soft_delete::<ApiKeyEntity, _>(&self.db, id).await
    }

    pub async fn list_for_organization(
        &self,
        organization_id: i32,
        include_deleted: bool,
    ) -> Result<Vec<ApiKey>, DbErr> {
        scoped::<ApiKeyEntity>(include_deleted)
            .filter(api_key::Column::OrganizationId.eq(organization_id))
            .order_by_asc(api_key::Column::Id)
            .all(&self.db)
            .await
    }
}
