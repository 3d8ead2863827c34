use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "subscription_plan_features")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub subscription_plan_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub feature_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subscription_plan::Entity",
        from = "Column::SubscriptionPlanId",
        to = "super::subscription_plan::Column::Id",
        on_delete = "Cascade"
    )]
    SubscriptionPlan,
    #[sea_orm(
        belongs_to = "super::feature::Entity",
        from = "Column::FeatureId",
        to = "super::feature::Column::Id",
        on_delete = "Cascade"
    )]
    Feature,
}

impl ActiveModelBehavior for ActiveModel {}
