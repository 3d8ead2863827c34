use sea_orm::{entity::prelude::*, FromJsonQueryResult};
use serde::{Deserialize, Serialize};

/// Entities sharing the base record: integer id, timestamps and a
/// `deleted_at` soft-delete marker. Reads go through `repos::scope`, which
/// uses these columns to hide deleted rows.
pub trait SoftDelete: EntityTrait {
    fn id_column() -> Self::Column;
    fn updated_at_column() -> Self::Column;
    fn deleted_at_column() -> Self::Column;
}

/// Implements [`SoftDelete`] for the `Entity` of the calling module.
macro_rules! soft_delete_entity {
    () => {
        impl crate::models::base::SoftDelete for Entity {
            fn id_column() -> Column {
                Column::Id
            }

            fn updated_at_column() -> Column {
                Column::UpdatedAt
            }

            fn deleted_at_column() -> Column {
                Column::DeletedAt
            }
        }
    };
}

pub(crate) use soft_delete_entity;

/// List of strings kept in a JSON column (API key permissions, report
/// recipients).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct StringList(pub Vec<String>);

impl From<Vec<String>> for StringList {
    fn from(items: Vec<String>) -> Self {
        Self(items)
    }
}
