use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::{
    core::state::AppState,
    handlers::{ensure_self_or_admin, include_deleted, ListQuery},
    models::{
        activity_log::Model as ActivityLog,
        notification_preference::{Model as NotificationPreference, PreferenceChanges},
        organization::Model as Organization,
        role::Model as Role,
        user::{Model as User, NewUser, UserChanges},
    },
    repos::{
        activity_logs::ActivityLogsRepo, notification_preferences::NotificationPreferencesRepo,
        users::UsersRepo,
    },
    utils::{
        jwt::Claims,
        response::{APIError, APIResponse, Created},
    },
};

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    token: String,
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewUser>,
) -> Result<Created<User>, APIError> {
    let user = UsersRepo::new(state.database.clone())
        .create(payload, state.config.bcrypt_cost)
        .await
        .map_err(|e| {
            error!("Failed to create user: {}", e);
            APIError::from(e)
        })?;
    info!("Created user {}", user.id);

    Ok(Created(user))
}

pub async fn verify_email(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VerifyEmailRequest>,
) -> Result<Json<User>, APIError> {
    let user = UsersRepo::new(state.database.clone())
        .verify_email(&payload.token)
        .await?;
    info!("Verified email for user {}", user.id);

    Ok(Json(user))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<User>>, APIError> {
    let include_deleted = include_deleted(&claims, &query)?;
    let users = UsersRepo::new(state.database.clone())
        .list(include_deleted)
        .await?;

    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<User>, APIError> {
    let user = UsersRepo::new(state.database.clone()).get(id).await?;

    Ok(Json(user))
}

/// Admins may update anyone; everyone else only themselves.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<UserChanges>,
) -> Result<Json<User>, APIError> {
    ensure_self_or_admin(&claims, id)?;

    let user = UsersRepo::new(state.database.clone())
        .update(id, payload, state.config.bcrypt_cost)
        .await
        .map_err(|e| {
            error!("Failed to update user {}: {}", id, e);
            APIError::from(e)
        })?;

    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<APIResponse, APIError> {
    UsersRepo::new(state.database.clone()).soft_delete(id).await?;
    info!("Deleted user {}", id);

    Ok(APIResponse::NoContent)
}

pub async fn list_user_roles(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<Role>>, APIError> {
    let users_repo = UsersRepo::new(state.database.clone());
    let user = users_repo.get(id).await?;

    Ok(Json(users_repo.roles(&user).await?))
}

pub async fn assign_user_role(
    State(state): State<Arc<AppState>>,
    Path((id, role_id)): Path<(i32, i32)>,
) -> Result<APIResponse, APIError> {
    UsersRepo::new(state.database.clone())
        .assign_role(id, role_id)
        .await?;
    info!("Assigned role {} to user {}", role_id, id);

    Ok(APIResponse::OK)
}

/// Every permission the user holds, through roles or granted directly.
pub async fn list_user_permissions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<String>>, APIError> {
    let users_repo = UsersRepo::new(state.database.clone());
    let user = users_repo.get(id).await?;

    Ok(Json(users_repo.permission_names(&user).await?))
}

pub async fn grant_user_permission(
    State(state): State<Arc<AppState>>,
    Path((id, permission_id)): Path<(i32, i32)>,
) -> Result<APIResponse, APIError> {
    UsersRepo::new(state.database.clone())
        .grant_permission(id, permission_id)
        .await?;
    info!("Granted permission {} to user {}", permission_id, id);

    Ok(APIResponse::OK)
}

pub async fn list_user_organizations(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<Organization>>, APIError> {
    ensure_self_or_admin(&claims, id)?;

    let users_repo = UsersRepo::new(state.database.clone());
    let user = users_repo.get(id).await?;

    Ok(Json(users_repo.organizations(&user).await?))
}

pub async fn list_user_activity(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<ActivityLog>>, APIError> {
    ensure_self_or_admin(&claims, id)?;

    let activity = ActivityLogsRepo::new(state.database.clone())
        .list_for_user(id)
        .await?;

    Ok(Json(activity))
}

pub async fn get_notification_preferences(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> Result<Json<NotificationPreference>, APIError> {
    ensure_self_or_admin(&claims, id)?;

    let preferences = NotificationPreferencesRepo::new(state.database.clone())
        .get_for_user(id)
        .await?;

    Ok(Json(preferences))
}

pub async fn update_notification_preferences(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<PreferenceChanges>,
) -> Result<Json<NotificationPreference>, APIError> {
    ensure_self_or_admin(&claims, id)?;

    let preferences = NotificationPreferencesRepo::new(state.database.clone())
        .update_for_user(id, payload)
        .await?;

    Ok(Json(preferences))
}
