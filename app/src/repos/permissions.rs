use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, QueryOrder};

use crate::{
    models::permission::{self, Entity as PermissionEntity, Model as Permission, NewPermission},
    repos::scope::{find_live, live, soft_delete},
};

pub struct PermissionsRepo {
    db: DatabaseConnection,
}

impl PermissionsRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, new_permission: NewPermission) -> Result<Permission, DbErr> {
        new_permission.into_active_model().insert(&self.db).await
    }

    pub async fn get(&self, id: i32) -> Result<Permission, DbErr> {
        find_live::<PermissionEntity, _>(&self.db, id).await
    }

    pub async fn list(&self) -> Result<Vec<Permission>, DbErr> {
        live::<PermissionEntity>()
            .order_by_asc(permission::Column::Name)
            .all(&self.db)
            .await
    }

    pub async fn soft_delete(&self, id: i32) -> Result<(), DbErr> {
        soft_delete::<PermissionEntity, _>(&self.db, id).await
    }
}
