use sea_orm_migration::{prelude::*, schema::*};

use crate::base::{base_table, drop_tables, index_deleted_at, join_table, references};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                base_table("users")
                    .col(string("email").unique_key())
                    .col(string("password_hash"))
                    .col(string("name"))
                    .col(string_null("verification_token"))
                    .col(boolean("verified").default(false))
                    .col(string("locale").default(""))
                    .col(string("timezone").default(""))
                    .col(string("language").default(""))
                    .to_owned(),
            )
            .await?;

        // roles
        manager
            .create_table(
                base_table("roles")
                    .col(string("name").unique_key())
                    .to_owned(),
            )
            .await?;

        // permissions
        manager
            .create_table(
                base_table("permissions")
                    .col(string("name").unique_key())
                    .col(string("description").default(""))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(join_table(
                "user_roles",
                ("user_id", "users"),
                ("role_id", "roles"),
            ))
            .await?;
        manager
            .create_table(join_table(
                "user_permissions",
                ("user_id", "users"),
                ("permission_id", "permissions"),
            ))
            .await?;
        manager
            .create_table(join_table(
                "role_permissions",
                ("role_id", "roles"),
                ("permission_id", "permissions"),
            ))
            .await?;

        // notification_preferences, one row per user
        manager
            .create_table(
                base_table("notification_preferences")
                    .col(integer("user_id").unique_key())
                    .col(boolean("email_enabled").default(true))
                    .col(boolean("sms_enabled").default(false))
                    .col(boolean("in_app_enabled").default(true))
                    .col(boolean("billing_emails").default(true))
                    .col(boolean("product_emails").default(true))
                    .col(boolean("marketing_emails").default(false))
                    .foreign_key(&mut references(
                        "notification_preferences",
                        "user_id",
                        "users",
                    ))
                    .to_owned(),
            )
            .await?;

        for table in ["users", "roles", "permissions", "notification_preferences"] {
            index_deleted_at(manager, table).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_tables(
            manager,
            &[
                "notification_preferences",
                "role_permissions",
                "user_permissions",
                "user_roles",
                "permissions",
                "roles",
                "users",
            ],
        )
        .await
    }
}
