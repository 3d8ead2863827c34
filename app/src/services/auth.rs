use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::{
    models::{
        role::{Model as Role, ADMIN_ROLE, USER_ROLE},
        user::Model as User,
    },
    repos::users::UsersRepo,
    services::credentials::verify_password,
    utils::jwt::KeyRing,
};

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Database Error: {0}")]
    Db(#[from] DbErr),

    #[error("Token Error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Serialize)]
pub struct Session {
    pub token: String,
    pub role: String,
    pub permissions: Vec<String>,
    pub user: User,
}

/// The gate only knows the two reserved roles; holding the admin role row
/// makes the caller an admin, anything else is a plain user.
pub fn resolve_role(roles: &[Role]) -> &'static str {
    if roles.iter().any(|r| r.name == ADMIN_ROLE) {
        ADMIN_ROLE
    } else {
        USER_ROLE
    }
}

pub async fn login(
    db: &DatabaseConnection,
    keys: &KeyRing,
    email: &str,
    password: &str,
    expiry_hours: i64,
) -> Result<Session, LoginError> {
    let users_repo = UsersRepo::new(db.clone());

    let user = match users_repo.get_by_email(email).await {
        Ok(u) => u,
        Err(DbErr::RecordNotFound(_)) => return Err(LoginError::InvalidCredentials),
        Err(e) => return Err(e.into()),
    };
    if !verify_password(password, &user.password_hash) {
        return Err(LoginError::InvalidCredentials);
    }

    let roles = users_repo.roles(&user).await?;
    let role = resolve_role(&roles);
    let permissions = users_repo.permission_names(&user).await?;

    let token = keys.issue(user.id, role, permissions.clone(), expiry_hours)?;
    info!("User {} logged in as {}", user.id, role);

    Ok(Session {
        token,
        role: role.to_string(),
        permissions,
        user,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(name: &str) -> Role {
        let now = chrono::Utc::now();
        Role {
            id: 1,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            name: name.to_string(),
        }
    }

    #[test]
    fn admin_role_row_wins() {
        assert_eq!(resolve_role(&[role("billing"), role("admin")]), ADMIN_ROLE);
    }

    #[test]
    fn everyone_else_is_a_user() {
        assert_eq!(resolve_role(&[]), USER_ROLE);
        assert_eq!(resolve_role(&[role("billing"), role("user")]), USER_ROLE);
    }
}
