use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, QueryFilter, QueryOrder};

use crate::{
    models::{
        organization::Entity as OrganizationEntity,
        payment_transaction::{
            self, Entity as PaymentTransactionEntity, Model as PaymentTransaction,
            NewPaymentTransaction,
        },
        subscription::{
            self, Entity as SubscriptionEntity, Model as Subscription, NewSubscription,
            SubscriptionChanges,
        },
        subscription_plan::Entity as PlanEntity,
    },
    repos::scope::{find_live, live, scoped, soft_delete},
};

pub struct SubscriptionsRepo {
    db: DatabaseConnection,
}

impl SubscriptionsRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new_subscription: NewSubscription) -> Result<Subscription, DbErr> {
        find_live::<OrganizationEntity, _>(&self.db, new_subscription.organization_id).await?;
        if let Some(plan_id) = new_subscription.plan_id {
            find_live::<PlanEntity, _>(&self.db, plan_id).await?;
        }

        new_subscription.into_active_model().insert(&self.db).await
    }

    pub async fn get(&self, id: i32) -> Result<Subscription, DbErr> {
        find_live::<SubscriptionEntity, _>(&self.db, id).await
    }

    pub async fn update(
        &self,
        id: i32,
        changes: SubscriptionChanges,
    ) -> Result<Subscription, DbErr> {
        let subscription = self.get(id).await?;
        if let Some(plan_id) = changes.plan_id {
            find_live::<PlanEntity, _>(&self.db, plan_id).await?;
        }

        changes.apply(subscription).update(&self.db).await
    }

    pub async fn soft_delete(&self, id: i32) -> Result<(), DbErr> {
        soft_delete::<SubscriptionEntity, _>(&self.db, id).await
    }

    pub async fn list_for_organization(
        &self,
        organization_id: i32,
        include_deleted: bool,
    ) -> Result<Vec<Subscription>, DbErr> {
        scoped::<SubscriptionEntity>(include_deleted)
            .filter(subscription::Column::OrganizationId.eq(organization_id))
            .order_by_asc(subscription::Column::Id)
            .all(&self.db)
            .await
    }

    /// Transactions are immutable once recorded.
    pub async fn record_transaction(
        &self,
        subscription_id: i32,
        transaction: NewPaymentTransaction,
    ) -> Result<PaymentTransaction, DbErr> {
        self.get(subscription_id).await?;

        transaction
            .into_active_model(subscription_id)
            .insert(&self.db)
            .await
    }

    pub async fn transactions(&self, subscription_id: i32) -> Result<Vec<PaymentTransaction>, DbErr> {
        self.get(subscription_id).await?;

        live::<PaymentTransactionEntity>()
            .filter(payment_transaction::Column::SubscriptionId.eq(subscription_id))
            .order_by_asc(payment_transaction::Column::Timestamp)
            .all(&self.db)
            .await
    }
}
