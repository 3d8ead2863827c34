use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr, ModelTrait, QueryOrder,
    TransactionTrait,
};
use tracing::info;

use crate::{
    models::{
        api_key::{self, Entity as ApiKeyEntity},
        domain::{self, Entity as DomainEntity},
        organization::{
            Entity as OrganizationEntity, Model as Organization, NewOrganization,
            OrganizationChanges,
        },
        report::{self, Entity as ReportEntity},
        seat::{self, Entity as SeatEntity},
        subscription::{self, Entity as SubscriptionEntity},
        user::{self, Entity as UserEntity, Model as User},
        user_organization,
        workflow::{self, Entity as WorkflowEntity},
    },
    repos::scope::{find_live, hide_deleted, link, live, soft_delete, soft_delete_where},
};

pub struct OrganizationsRepo {
    db: DatabaseConnection,
}

impl OrganizationsRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates the organization and makes `creator` its first member. Either
    /// both rows land or neither does.
    pub async fn create(
        &self,
        new_organization: NewOrganization,
        creator: i32,
    ) -> Result<Organization, DbErr> {
        let txn = self.db.begin().await?;

        find_live::<UserEntity, _>(&txn, creator).await?;
        let organization = new_organization.into_active_model().insert(&txn).await?;
        link(
            &txn,
            user_organization::ActiveModel {
                user_id: Set(creator),
                organization_id: Set(organization.id),
            },
        )
        .await?;

        txn.commit().await?;

        Ok(organization)
    }

    pub async fn get(&self, id: i32) -> Result<Organization, DbErr> {
        find_live::<OrganizationEntity, _>(&self.db, id).await
    }

    pub async fn list(&self) -> Result<Vec<Organization>, DbErr> {
        live::<OrganizationEntity>()
            .order_by_asc(crate::models::organization::Column::Id)
            .all(&self.db)
            .await
    }

    pub async fn update(
        &self,
        id: i32,
        changes: OrganizationChanges,
    ) -> Result<Organization, DbErr> {
        let organization = self.get(id).await?;
        changes.apply(organization).update(&self.db).await
    }

    /// Soft-deletes the organization and everything it owns. Audit and
    /// activity logs are left alone.
    pub async fn soft_delete(&self, id: i32) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;

        soft_delete::<OrganizationEntity, _>(&txn, id).await?;
        let domains =
            soft_delete_where::<DomainEntity, _>(&txn, domain::Column::OrganizationId, id).await?;
        let seats =
            soft_delete_where::<SeatEntity, _>(&txn, seat::Column::OrganizationId, id).await?;
        let subscriptions = soft_delete_where::<SubscriptionEntity, _>(
            &txn,
            subscription::Column::OrganizationId,
            id,
        )
        .await?;
        let api_keys =
            soft_delete_where::<ApiKeyEntity, _>(&txn, api_key::Column::OrganizationId, id)
                .await?;
        let workflows =
            soft_delete_where::<WorkflowEntity, _>(&txn, workflow::Column::OrganizationId, id)
                .await?;
        let reports =
            soft_delete_where::<ReportEntity, _>(&txn, report::Column::OrganizationId, id).await?;

        txn.commit().await?;

        info!(
            organization = id,
            domains, seats, subscriptions, api_keys, workflows, reports, "Organization deleted"
        );

        Ok(())
    }

    pub async fn add_member(&self, organization_id: i32, user_id: i32) -> Result<(), DbErr> {
        self.get(organization_id).await?;
        find_live::<UserEntity, _>(&self.db, user_id).await?;

        link(
            &self.db,
            user_organization::ActiveModel {
                user_id: Set(user_id),
                organization_id: Set(organization_id),
            },
        )
        .await
    }

    pub async fn members(&self, organization_id: i32) -> Result<Vec<User>, DbErr> {
        let organization = self.get(organization_id).await?;

        hide_deleted(organization.find_related(UserEntity))
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
    }
}
