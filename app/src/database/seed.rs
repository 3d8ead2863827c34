use sea_orm::{DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::{
    config::config::Config,
    models::{
        role::{ADMIN_ROLE, USER_ROLE},
        user::NewUser,
    },
    repos::{roles::RolesRepo, users::UsersRepo, WriteError},
};

/// Ensures the reserved roles exist and, when `ADMIN_PASSWORD` is set, an
/// admin user holding the admin role.
pub async fn seed_defaults(db: &DatabaseConnection, config: &Config) -> Result<(), WriteError> {
    let roles_repo = RolesRepo::new(db.clone());
    let admin_role = roles_repo.ensure(ADMIN_ROLE).await?;
    roles_repo.ensure(USER_ROLE).await?;

    let Some(password) = config.admin_password.clone() else {
        warn!("ADMIN_PASSWORD not set, skipping admin user");
        return Ok(());
    };

    let users_repo = UsersRepo::new(db.clone());
    let mut admin = match users_repo.get_by_email(&config.admin_email).await {
        Ok(existing) => {
            info!("Default admin already exists");
            existing
        }
        Err(DbErr::RecordNotFound(_)) => {
            let new_admin = NewUser {
                email: config.admin_email.clone(),
                password,
                name: "Administrator".to_string(),
                locale: String::new(),
                timezone: String::new(),
                language: String::new(),
            };
            let admin = users_repo.create(new_admin, config.bcrypt_cost).await?;
            info!("Created default admin: {}", admin.email);
            admin
        }
        Err(e) => return Err(e.into()),
    };
    if !admin.verified {
        admin = users_repo.mark_verified(admin).await?;
    }

    users_repo.assign_role(admin.id, admin_role.id).await?;

    Ok(())
}
