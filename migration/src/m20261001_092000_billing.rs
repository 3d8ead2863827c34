use sea_orm_migration::{prelude::*, schema::*};

use crate::base::{base_table, drop_tables, index_deleted_at, join_table, references};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // subscription_plans
        manager
            .create_table(
                base_table("subscription_plans")
                    .col(string("name"))
                    .col(string("description").default(""))
                    .col(double("price"))
                    .col(string("currency"))
                    .col(string("interval"))
                    .to_owned(),
            )
            .await?;

        // features
        manager
            .create_table(
                base_table("features")
                    .col(string("name"))
                    .col(string("description").default(""))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(join_table(
                "subscription_plan_features",
                ("subscription_plan_id", "subscription_plans"),
                ("feature_id", "features"),
            ))
            .await?;

        // subscriptions
        manager
            .create_table(
                base_table("subscriptions")
                    .col(integer("organization_id"))
                    .col(integer_null("plan_id"))
                    .col(string("status"))
                    .col(timestamp_with_time_zone("start_date"))
                    .col(timestamp_with_time_zone_null("end_date"))
                    .col(string("payment_method").default(""))
                    .col(timestamp_with_time_zone_null("last_payment_date"))
                    .col(timestamp_with_time_zone_null("next_billing_date"))
                    .foreign_key(&mut references(
                        "subscriptions",
                        "organization_id",
                        "organizations",
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscriptions_plan_id")
                            .from("subscriptions", "plan_id")
                            .to("subscription_plans", "id")
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // payment_transactions
        manager
            .create_table(
                base_table("payment_transactions")
                    .col(integer("subscription_id"))
                    .col(double("amount"))
                    .col(string("currency"))
                    .col(string("status"))
                    .col(string("gateway"))
                    .col(string("gateway_id"))
                    .col(timestamp_with_time_zone("timestamp"))
                    .foreign_key(&mut references(
                        "payment_transactions",
                        "subscription_id",
                        "subscriptions",
                    ))
                    .to_owned(),
            )
            .await?;

        for table in [
            "subscription_plans",
            "features",
            "subscriptions",
            "payment_transactions",
        ] {
            index_deleted_at(manager, table).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_tables(
            manager,
            &[
                "payment_transactions",
                "subscriptions",
                "subscription_plan_features",
                "features",
                "subscription_plans",
            ],
        )
        .await
    }
}
