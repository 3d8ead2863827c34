use sea_orm_migration::{prelude::*, schema::*};

use crate::base::{base_table, drop_tables, index_deleted_at, join_table, references};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // organizations, settings are embedded columns
        manager
            .create_table(
                base_table("organizations")
                    .col(string("name"))
                    .col(string("logo_url").default(""))
                    .col(string("theme_color").default(""))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(join_table(
                "user_organizations",
                ("user_id", "users"),
                ("organization_id", "organizations"),
            ))
            .await?;

        // domains
        manager
            .create_table(
                base_table("domains")
                    .col(integer("organization_id"))
                    .col(string("domain").unique_key())
                    .col(boolean("verified").default(false))
                    .foreign_key(&mut references("domains", "organization_id", "organizations"))
                    .to_owned(),
            )
            .await?;

        // seats
        manager
            .create_table(
                base_table("seats")
                    .col(integer("organization_id"))
                    .col(integer("user_id"))
                    .col(string("status"))
                    .foreign_key(&mut references("seats", "organization_id", "organizations"))
                    .foreign_key(&mut references("seats", "user_id", "users"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(join_table(
                "seat_roles",
                ("seat_id", "seats"),
                ("role_id", "roles"),
            ))
            .await?;

        // api_keys
        manager
            .create_table(
                base_table("api_keys")
                    .col(integer("user_id"))
                    .col(integer("organization_id"))
                    .col(string("key").unique_key())
                    .col(string("name"))
                    .col(json_binary("permissions"))
                    .col(timestamp_with_time_zone_null("expires_at"))
                    .col(timestamp_with_time_zone_null("last_used_at"))
                    .foreign_key(&mut references("api_keys", "user_id", "users"))
                    .foreign_key(&mut references("api_keys", "organization_id", "organizations"))
                    .to_owned(),
            )
            .await?;

        // workflows
        manager
            .create_table(
                base_table("workflows")
                    .col(integer("organization_id"))
                    .col(integer("creator_id"))
                    .col(string("name"))
                    .col(string("description").default(""))
                    .col(json_binary("steps"))
                    .col(boolean("enabled").default(false))
                    .foreign_key(&mut references("workflows", "organization_id", "organizations"))
                    .to_owned(),
            )
            .await?;

        // reports
        manager
            .create_table(
                base_table("reports")
                    .col(integer("organization_id"))
                    .col(integer("creator_id"))
                    .col(string("name"))
                    .col(string("description").default(""))
                    .col(text("query"))
                    .col(string("schedule").default(""))
                    .col(json_binary("recipients"))
                    .col(timestamp_with_time_zone_null("last_run_at"))
                    .foreign_key(&mut references("reports", "organization_id", "organizations"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_seats_organization_user")
                    .table("seats")
                    .col("organization_id")
                    .col("user_id")
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        for table in [
            "organizations",
            "domains",
            "seats",
            "api_keys",
            "workflows",
            "reports",
        ] {
            index_deleted_at(manager, table).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_tables(
            manager,
            &[
                "reports",
                "workflows",
                "api_keys",
                "seat_roles",
                "seats",
                "domains",
                "user_organizations",
                "organizations",
            ],
        )
        .await
    }
}
