use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, QueryFilter, QueryOrder};

use crate::{
    models::{
        domain::{self, DomainChanges, Entity as DomainEntity, Model as Domain, NewDomain},
        organization::Entity as OrganizationEntity,
    },
    repos::{
        scope::{find_live, scoped, soft_delete},
        WriteError,
    },
};

pub struct DomainsRepo {
    db: DatabaseConnection,
}

impl DomainsRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new_domain: NewDomain) -> Result<Domain, WriteError> {
        find_live::<OrganizationEntity, _>(&self.db, new_domain.organization_id).await?;

        let raw = new_domain.domain.clone();
        let domain_model = new_domain
            .into_active_model()
            .ok_or_else(|| WriteError::Invalid(format!("'{}' is not a valid hostname", raw)))?;

        Ok(domain_model.insert(&self.db).await?)
    }

    pub async fn get(&self, id: i32) -> Result<Domain, DbErr> {
        find_live::<DomainEntity, _>(&self.db, id).await
    }

    pub async fn update(&self, id: i32, changes: DomainChanges) -> Result<Domain, DbErr> {
        let domain = self.get(id).await?;
        changes.apply(domain).update(&self.db).await
    }

    pub async fn soft_delete(&self, id: i32) -> Result<(), DbErr> {
        soft_delete::<DomainEntity, _>(&self.db, id).await
    }

    pub async fn list_for_organization(
        &self,
        organization_id: i32,
        include_deleted: bool,
    ) -> Result<Vec<Domain>, DbErr> {
        scoped::<DomainEntity>(include_deleted)
            .filter(domain::Column::OrganizationId.eq(organization_id))
            .order_by_asc(domain::Column::Id)
            .all(&self.db)
            .await
    }
}
