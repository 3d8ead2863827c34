use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use tracing::{error, info};

use crate::{
    core::state::AppState,
    handlers::ensure_self_or_admin,
    models::{
        api_key::{ApiKeyChanges, IssuedApiKey, Model as ApiKey, NewApiKey},
        audit_log::AuditChanges,
    },
    repos::api_keys::ApiKeysRepo,
    services::audit,
    utils::{
        jwt::Claims,
        response::{APIError, APIResponse, Created},
    },
};

const RESOURCE: &str = "api_key";

/// The key belongs to the caller. Its secret value is returned here and
/// nowhere else, and is not written to the audit trail.
pub async fn create_api_key(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewApiKey>,
) -> Result<Created<IssuedApiKey>, APIError> {
    let api_key = ApiKeysRepo::new(state.database.clone())
        .create(payload, claims.id)
        .await
        .map_err(|e| {
            error!("Failed to create api key: {}", e);
            APIError::from(e)
        })?;
    info!("User {} created api key {}", claims.id, api_key.id);

    audit::record(
        &state.database,
        claims.id,
        api_key.organization_id,
        "create",
        RESOURCE,
        api_key.id,
        AuditChanges::default().field("name", serde_json::Value::Null, &api_key.name),
    )
    .await;

    Ok(Created(api_key.into()))
}

/// Only the owner and admins may see or manage a key.
pub async fn get_api_key(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> Result<Json<ApiKey>, APIError> {
    let api_key = ApiKeysRepo::new(state.database.clone()).get(id).await?;
    ensure_self_or_admin(&claims, api_key.user_id)?;

    Ok(Json(api_key))
}

pub async fn update_api_key(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<ApiKeyChanges>,
) -> Result<Json<ApiKey>, APIError> {
    let api_keys_repo = ApiKeysRepo::new(state.database.clone());
    let before = api_keys_repo.get(id).await?;
    ensure_self_or_admin(&claims, before.user_id)?;
    let after = api_keys_repo.update(id, payload).await?;

    audit::record(
        &state.database,
        claims.id,
        after.organization_id,
        "update",
        RESOURCE,
        id,
        audit::diff(&before, &after),
    )
    .await;

    Ok(Json(after))
}

pub async fn delete_api_key(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> Result<APIResponse, APIError> {
    let api_keys_repo = ApiKeysRepo::new(state.database.clone());
    let api_key = api_keys_repo.get(id).await?;
    ensure_self_or_admin(&claims, api_key.user_id)?;
    api_keys_repo.soft_delete(id).await?;

    audit::record(
        &state.database,
        claims.id,
        api_key.organization_id,
        "delete",
        RESOURCE,
        id,
        AuditChanges::default(),
    )
    .await;

    Ok(APIResponse::NoContent)
}
