use sea_orm_migration::{prelude::*, schema::*};

/// Table with the columns every entity shares: id, timestamps and the
/// soft-delete marker.
pub(crate) fn base_table(name: &'static str) -> TableCreateStatement {
    Table::create()
        .table(name)
        .if_not_exists()
        .col(pk_auto("id"))
        .col(timestamp_with_time_zone("created_at"))
        .col(timestamp_with_time_zone("updated_at"))
        .col(timestamp_with_time_zone_null("deleted_at"))
        .to_owned()
}

/// Join table keyed by the pair of foreign keys, both cascading.
pub(crate) fn join_table(
    name: &'static str,
    left: (&'static str, &'static str),
    right: (&'static str, &'static str),
) -> TableCreateStatement {
    let (left_col, left_table) = left;
    let (right_col, right_table) = right;

    Table::create()
        .table(name)
        .if_not_exists()
        .col(integer(left_col))
        .col(integer(right_col))
        .primary_key(Index::create().col(left_col).col(right_col))
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{name}_{left_table}"))
                .from(name, left_col)
                .to(left_table, "id")
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name(format!("fk_{name}_{right_table}"))
                .from(name, right_col)
                .to(right_table, "id")
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

/// Foreign key from `table.column` to `target.id`.
pub(crate) fn references(
    table: &'static str,
    column: &'static str,
    target: &'static str,
) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(format!("fk_{table}_{column}"))
        .from(table, column)
        .to(target, "id")
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

pub(crate) async fn index_deleted_at(
    manager: &SchemaManager<'_>,
    table: &'static str,
) -> Result<(), DbErr> {
    manager
        .create_index(
            Index::create()
                .name(format!("idx_{table}_deleted_at"))
                .table(table)
                .col("deleted_at")
                .if_not_exists()
                .to_owned(),
        )
        .await
}

pub(crate) async fn drop_tables(
    manager: &SchemaManager<'_>,
    tables: &[&'static str],
) -> Result<(), DbErr> {
    for table in tables {
        manager
            .drop_table(Table::drop().table(*table).if_exists().to_owned())
            .await?;
    }

    Ok(())
}
