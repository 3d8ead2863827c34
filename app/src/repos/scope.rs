//! Query construction shared by every repository. Reads go through
//! [`live`] / [`hide_deleted`] so soft-deleted rows never leak into default
//! listings; deletes go through [`soft_delete`].

use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, Iterable,
    PrimaryKeyToColumn, QueryFilter, Select,
};

use crate::models::base::SoftDelete;

pub fn hide_deleted<E: SoftDelete>(select: Select<E>) -> Select<E> {
    select.filter(E::deleted_at_column().is_null())
}

pub fn live<E: SoftDelete>() -> Select<E> {
    hide_deleted(E::find())
}

/// `live` unless the caller explicitly asked for deleted rows too.
pub fn scoped<E: SoftDelete>(include_deleted: bool) -> Select<E> {
    if include_deleted {
        E::find()
    } else {
        live::<E>()
    }
}

pub fn not_found<E: EntityTrait>(id: i32) -> DbErr {
    DbErr::RecordNotFound(format!("{} {} not found", E::default().table_name(), id))
}

pub async fn find_live<E, C>(db: &C, id: i32) -> Result<E::Model, DbErr>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    live::<E>()
        .filter(E::id_column().eq(id))
        .one(db)
        .await?
        .ok_or_else(|| not_found::<E>(id))
}

/// Stamps `deleted_at` on one live row. Deleting a row that is already gone
/// is a not-found error.
pub async fn soft_delete<E, C>(db: &C, id: i32) -> Result<(), DbErr>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    let affected = soft_delete_where::<E, C>(db, E::id_column(), id).await?;
    if affected == 0 {
        return Err(not_found::<E>(id));
    }

    Ok(())
}

/// Stamps `deleted_at` on every live row whose `column` equals `value`.
pub async fn soft_delete_where<E, C>(db: &C, column: E::Column, value: i32) -> Result<u64, DbErr>
where
    E: SoftDelete,
    C: ConnectionTrait,
{
    let now = Utc::now();
    let result = E::update_many()
        .col_expr(E::deleted_at_column(), Expr::value(now))
        .col_expr(E::updated_at_column(), Expr::value(now))
        .filter(column.eq(value))
        .filter(E::deleted_at_column().is_null())
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Inserts a join-table row, doing nothing if the pair already exists.
pub async fn link<A, C>(db: &C, row: A) -> Result<(), DbErr>
where
    A: ActiveModelTrait,
    C: ConnectionTrait,
{
    let primary_key = <A::Entity as EntityTrait>::PrimaryKey::iter().map(|key| key.into_column());

    <A::Entity as EntityTrait>::insert(row)
        .on_conflict(OnConflict::columns(primary_key).do_nothing().to_owned())
        .exec_without_returning(db)
        .await?;

    Ok(())
}
