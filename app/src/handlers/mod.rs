pub mod api_keys;
pub mod auth;
pub mod domains;
pub mod logs;
pub mod organizations;
pub mod plans;
pub mod reports;
pub mod roles;
pub mod seats;
pub mod subscriptions;
pub mod users;
pub mod workflows;

use serde::Deserialize;
use tracing::warn;

use crate::{
    models::role::ADMIN_ROLE,
    utils::{jwt::Claims, response::APIError},
};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_deleted: bool,
}

/// Soft-deleted rows are only listed for admins.
pub fn include_deleted(claims: &Claims, query: &ListQuery) -> Result<bool, APIError> {
    if query.include_deleted && claims.role != ADMIN_ROLE {
        warn!("User {} asked for deleted rows without the admin role", claims.id);
        return Err(APIError::UnAuthorized);
    }

    Ok(query.include_deleted)
}

pub fn ensure_self_or_admin(claims: &Claims, user_id: i32) -> Result<(), APIError> {
    if claims.id == user_id || claims.role == ADMIN_ROLE {
        return Ok(());
    }

    Err(APIError::Forbidden(
        "You can only manage your own account".to_string(),
    ))
}
