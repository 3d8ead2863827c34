use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, ModelTrait,
    QueryFilter, QueryOrder,
};

use crate::{
    models::{
        permission::{Entity as PermissionEntity, Model as Permission},
        role::{self, is_reserved, Entity as RoleEntity, Model as Role, NewRole, RoleChanges},
        role_permission,
    },
    repos::{
        scope::{find_live, hide_deleted, link, live, soft_delete},
        WriteError,
    },
};

pub struct RolesRepo {
    db: DatabaseConnection,
}

impl RolesRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new_role: NewRole) -> Result<Role, DbErr> {
        new_role.into_active_model().insert(&self.db).await
    }

    pub async fn get(&self, id: i32) -> Result<Role, DbErr> {
        find_live::<RoleEntity, _>(&self.db, id).await
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Role>, DbErr> {
        live::<RoleEntity>()
            .filter(role::Column::Name.eq(name))
            .one(&self.db)
            .await
    }

    /// Returns the role called `name`, creating it first if needed.
    pub async fn ensure(&self, name: &str) -> Result<Role, DbErr> {
        if let Some(role) = self.get_by_name(name).await? {
            return Ok(role);
        }

        self.create(NewRole {
            name: name.to_string(),
        })
        .await
    }

    pub async fn list(&self) -> Result<Vec<Role>, DbErr> {
        live::<RoleEntity>()
            .order_by_asc(role::Column::Name)
            .all(&self.db)
            .await
    }

    /// Reserved roles keep their names; the request gate depends on them.
    pub async fn update(&self, id: i32, changes: RoleChanges) -> Result<Role, WriteError> {
        let role = self.get(id).await?;
        if is_reserved(&role.name) && changes.name.as_deref().is_some_and(|n| n != role.name) {
            return Err(WriteError::Conflict(format!(
                "Role '{}' is reserved and cannot be renamed",
                role.name
            )));
        }

        Ok(changes.apply(role).update(&self.db).await?)
    }

    pub async fn soft_delete(&self, id: i32) -> Result<(), WriteError> {
        let role = self.get(id).await?;
        if is_reserved(&role.name) {
            return Err(WriteError::Conflict(format!(
                "Role '{}' is reserved and cannot be deleted",
                role.name
            )));
        }

        Ok(soft_delete::<RoleEntity, _>(&self.db, id).await?)
    }

    pub async fn grant_permission(&self, role_id: i32, permission_id: i32) -> Result<(), DbErr> {
        find_live::<RoleEntity, _>(&self.db, role_id).await?;
        find_live::<PermissionEntity, _>(&self.db, permission_id).await?;

        link(
            &self.db,
            role_permission::ActiveModel {
                role_id: Set(role_id),
                permission_id: Set(permission_id),
            },
        )
        .await
    }

    pub async fn permissions(&self, role: &Role) -> Result<Vec<Permission>, DbErr> {
        hide_deleted(role.find_related(PermissionEntity))
            .all(&self.db)
            .await
    }
}
