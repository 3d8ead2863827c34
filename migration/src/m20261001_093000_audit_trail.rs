use sea_orm_migration::{prelude::*, schema::*};

use crate::base::{base_table, drop_tables, index_deleted_at};

/// Log tables carry plain integer references without foreign keys so that
/// entries outlive the rows they describe.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // audit_logs
        manager
            .create_table(
                base_table("audit_logs")
                    .col(integer("organization_id"))
                    .col(integer("user_id"))
                    .col(string("action"))
                    .col(string("resource_type"))
                    .col(integer("resource_id"))
                    .col(timestamp_with_time_zone("timestamp"))
                    .col(json_binary("changes"))
                    .to_owned(),
            )
            .await?;

        // activity_logs
        manager
            .create_table(
                base_table("activity_logs")
                    .col(integer("organization_id"))
                    .col(integer("user_id"))
                    .col(string("activity_type"))
                    .col(timestamp_with_time_zone("timestamp"))
                    .col(json_binary("metadata"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_logs_organization_id")
                    .table("audit_logs")
                    .col("organization_id")
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_activity_logs_user_id")
                    .table("activity_logs")
                    .col("user_id")
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        for table in ["audit_logs", "activity_logs"] {
            index_deleted_at(manager, table).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_tables(manager, &["activity_logs", "audit_logs"]).await
    }
}
