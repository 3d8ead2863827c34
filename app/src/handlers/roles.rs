use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{error, info};

use crate::{
    core::state::AppState,
    models::{
        permission::{Model as Permission, NewPermission},
        role::{Model as Role, NewRole, RoleChanges},
    },
    repos::{permissions::PermissionsRepo, roles::RolesRepo},
    utils::response::{APIError, APIResponse, Created},
};

pub async fn create_role(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewRole>,
) -> Result<Created<Role>, APIError> {
    let role = RolesRepo::new(state.database.clone())
        .create(payload)
        .await
        .map_err(|e| {
            error!("Failed to create role: {}", e);
            APIError::from(e)
        })?;
    info!("Created role {}", role.name);

    Ok(Created(role))
}

pub async fn list_roles(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Role>>, APIError> {
    Ok(Json(RolesRepo::new(state.database.clone()).list().await?))
}

pub async fn get_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Role>, APIError> {
    Ok(Json(RolesRepo::new(state.database.clone()).get(id).await?))
}

pub async fn update_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<RoleChanges>,
) -> Result<Json<Role>, APIError> {
    let role = RolesRepo::new(state.database.clone())
        .update(id, payload)
        .await?;

    Ok(Json(role))
}

pub async fn delete_role(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<APIResponse, APIError> {
    RolesRepo::new(state.database.clone()).soft_delete(id).await?;
    info!("Deleted role {}", id);

    Ok(APIResponse::NoContent)
}

pub async fn list_role_permissions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<Permission>>, APIError> {
    let roles_repo = RolesRepo::new(state.database.clone());
    let role = roles_repo.get(id).await?;

    Ok(Json(roles_repo.permissions(&role).await?))
}

pub async fn grant_role_permission(
    State(state): State<Arc<AppState>>,
    Path((id, permission_id)): Path<(i32, i32)>,
) -> Result<APIResponse, APIError> {
    RolesRepo::new(state.database.clone())
        .grant_permission(id, permission_id)
        .await?;
    info!("Granted permission {} to role {}", permission_id, id);

    Ok(APIResponse::OK)
}

pub async fn create_permission(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewPermission>,
) -> Result<Created<Permission>, APIError> {
    let permission = PermissionsRepo::new(state.database.clone())
        .create(payload)
        .await
        .map_err(|e| {
            error!("Failed to create permission: {}", e);
            APIError::from(e)
        })?;

    Ok(Created(permission))
}

pub async fn list_permissions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Permission>>, APIError> {
    Ok(Json(PermissionsRepo::new(state.database.clone()).list().await?))
}

pub async fn delete_permission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<APIResponse, APIError> {
    PermissionsRepo::new(state.database.clone())
        .soft_delete(id)
        .await?;

    Ok(APIResponse::NoContent)
}
