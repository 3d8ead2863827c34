use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr, ModelTrait, QueryOrder,
};

use crate::{
    models::{
        feature::{self, Entity as FeatureEntity, Model as Feature, NewFeature},
        plan_feature,
        subscription_plan::{
            self, Entity as PlanEntity, Model as SubscriptionPlan, NewPlan, PlanChanges,
        },
    },
    repos::scope::{find_live, hide_deleted, link, live, soft_delete},
};

pub struct PlansRepo {
    db: DatabaseConnection,
}

impl PlansRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new_plan: NewPlan) -> Result<SubscriptionPlan, DbErr> {
        new_plan.into_active_model().insert(&self.db).await
    }

    pub async fn get(&self, id: i32) -> Result<SubscriptionPlan, DbErr> {
        find_live::<PlanEntity, _>(&self.db, id).await
    }

    pub async fn list(&self) -> Result<Vec<SubscriptionPlan>, DbErr> {
        live::<PlanEntity>()
            .order_by_asc(subscription_plan::Column::Id)
            .all(&self.db)
            .await
    }

    pub async fn update(&self, id: i32, changes: PlanChanges) -> Result<SubscriptionPlan, DbErr> {
        let plan = self.get(id).await?;
        changes.apply(plan).update(&self.db).await
    }

    /// Subscriptions on a deleted plan keep their `plan_id`; reads of the
    /// plan itself stop finding it.
    pub async fn soft_delete(&self, id: i32) -> Result<(), DbErr> {
        soft_delete::<PlanEntity, _>(&self.db, id).await
    }

    pub async fn add_feature(&self, plan_id: i32, feature_id: i32) -> Result<(), DbErr> {
        self.get(plan_id).await?;
        find_live::<FeatureEntity, _>(&self.db, feature_id).await?;

        link(
            &self.db,
            plan_feature::ActiveModel {
                subscription_plan_id: Set(plan_id),
                feature_id: Set(feature_id),
            },
        )
        .await
    }

    pub async fn features(&self, plan_id: i32) -> Result<Vec<Feature>, DbErr> {
        let plan = self.get(plan_id).await?;

        hide_deleted(plan.find_related(FeatureEntity))
            .order_by_asc(feature::Column::Name)
            .all(&self.db)
            .await
    }
}

pub struct FeaturesRepo {
    db: DatabaseConnection,
}

impl FeaturesRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new_feature: NewFeature) -> Result<Feature, DbErr> {
        new_feature.into_active_model().insert(&self.db).await
    }

    pub async fn list(&self) -> Result<Vec<Feature>, DbErr> {
        live::<FeatureEntity>()
            .order_by_asc(feature::Column::Name)
            .all(&self.db)
            .await
    }

    pub async fn soft_delete(&self, id: i32) -> Result<(), DbErr> {
        soft_delete::<FeatureEntity, _>(&self.db, id).await
    }
}
