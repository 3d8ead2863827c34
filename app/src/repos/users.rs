use std::collections::BTreeSet;

use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, ModelTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};

use crate::{
    models::{
        notification_preference,
        organization::{Entity as OrganizationEntity, Model as Organization},
        permission::{Entity as PermissionEntity, Model as Permission},
        role::{self, Entity as RoleEntity, Model as Role},
        user::{self, ActiveModel, Entity as UserEntity, Model as User, NewUser, UserChanges},
        user_permission, user_role,
    },
    repos::{
        scope::{find_live, hide_deleted, link, live, scoped, soft_delete},
        WriteError,
    },
};

pub struct UsersRepo {
    db: DatabaseConnection,
}

impl UsersRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts the user together with default notification preferences.
    pub async fn create(&self, new_user: NewUser, cost: u32) -> Result<User, WriteError> {
        let user_model = new_user.into_active_model(cost)?;

        let txn = self.db.begin().await?;
        let user = user_model.insert(&txn).await?;
        notification_preference::defaults_for(user.id)
            .insert(&txn)
            .await?;
        txn.commit().await?;

        Ok(user)
    }

    pub async fn get(&self, id: i32) -> Result<User, DbErr> {
        find_live::<UserEntity, _>(&self.db, id).await
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User, DbErr> {
        live::<UserEntity>()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                DbErr::RecordNotFound(format!("User with the email {} not found", email))
            })
    }

    pub async fn list(&self, include_deleted: bool) -> Result<Vec<User>, DbErr> {
        scoped::<UserEntity>(include_deleted)
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
    }

    pub async fn update(
        &self,
        id: i32,
        changes: UserChanges,
        cost: u32,
    ) -> Result<User, WriteError> {
        let user = self.get(id).await?;
        let user = changes.apply(user, cost)?.update(&self.db).await?;

        Ok(user)
    }

    pub async fn soft_delete(&self, id: i32) -> Result<(), DbErr> {
        soft_delete::<UserEntity, _>(&self.db, id).await
    }

    /// Marks the owner of `token` verified and retires the token.
    pub async fn verify_email(&self, token: &str) -> Result<User, DbErr> {
        let not_found = || DbErr::RecordNotFound("Verification token not recognized".to_string());
        if token.is_empty() {
            return Err(not_found());
        }

        let user = live::<UserEntity>()
            .filter(user::Column::VerificationToken.eq(token))
            .one(&self.db)
            .await?
            .ok_or_else(not_found)?;

        self.mark_verified(user).await
    }

    /// Marks the user verified and consumes any outstanding token.
    pub async fn mark_verified(&self, user: User) -> Result<User, DbErr> {
        let mut user: ActiveModel = user.into();
        user.verified = Set(true);
        user.verification_token = Set(None);
        user.updated_at = Set(chrono::Utc::now());
        user.update(&self.db).await
    }

    pub async fn roles(&self, user: &User) -> Result<Vec<Role>, DbErr> {
        hide_deleted(user.find_related(RoleEntity))
            .order_by_asc(role::Column::Name)
            .all(&self.db)
            .await
    }

    pub async fn direct_permissions(&self, user: &User) -> Result<Vec<Permission>, DbErr> {
        hide_deleted(user.find_related(PermissionEntity))
            .all(&self.db)
            .await
    }

    /// Names of every permission the user holds, through a role or directly.
    pub async fn permission_names(&self, user: &User) -> Result<Vec<String>, DbErr> {
        let mut names = BTreeSet::new();

        for role in self.roles(user).await? {
            let granted = hide_deleted(role.find_related(PermissionEntity))
                .all(&self.db)
                .await?;
            names.extend(granted.into_iter().map(|p| p.name));
        }
        for permission in self.direct_permissions(user).await? {
            names.insert(permission.name);
        }

        Ok(names.into_iter().collect())
    }

    pub async fn organizations(&self, user: &User) -> Result<Vec<Organization>, DbErr> {
        hide_deleted(user.find_related(OrganizationEntity))
            .all(&self.db)
            .await
    }

    pub async fn assign_role(&self, user_id: i32, role_id: i32) -> Result<(), DbErr> {
        find_live::<UserEntity, _>(&self.db, user_id).await?;
        find_live::<RoleEntity, _>(&self.db, role_id).await?;

        link(
            &self.db,
            user_role::ActiveModel {
                user_id: Set(user_id),
                role_id: Set(role_id),
            },
        )
        .await
    }

    pub async fn grant_permission(&self, user_id: i32, permission_id: i32) -> Result<(), DbErr> {
        find_live::<UserEntity, _>(&self.db, user_id).await?;
        find_live::<PermissionEntity, _>(&self.db, permission_id).await?;

        link(
            &self.db,
            user_permission::ActiveModel {
                user_id: Set(user_id),
                permission_id: Set(permission_id),
            },
        )
        .await
    }
}
