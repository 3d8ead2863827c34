//! Audit and activity entries can be appended and read back, never changed.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use tracing::error;

use crate::{
    core::state::AppState,
    models::{
        activity_log::{Model as ActivityLog, NewActivityLog},
        audit_log::{Model as AuditLog, NewAuditLog},
    },
    repos::{activity_logs::ActivityLogsRepo, audit_logs::AuditLogsRepo},
    utils::{
        jwt::Claims,
        response::{APIError, Created},
    },
};

/// The actor is always the caller, whatever the payload says.
pub async fn create_audit_log(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewAuditLog>,
) -> Result<Created<AuditLog>, APIError> {
    let entry = AuditLogsRepo::new(state.database.clone())
        .append(payload, claims.id)
        .await
        .map_err(|e| {
            error!("Failed to append audit log: {}", e);
            APIError::from(e)
        })?;

    Ok(Created(entry))
}

pub async fn get_audit_log(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<AuditLog>, APIError> {
    Ok(Json(AuditLogsRepo::new(state.database.clone()).get(id).await?))
}

pub async fn create_activity(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewActivityLog>,
) -> Result<Created<ActivityLog>, APIError> {
    let entry = ActivityLogsRepo::new(state.database.clone())
        .append(payload, claims.id)
        .await
        .map_err(|e| {
            error!("Failed to append activity: {}", e);
            APIError::from(e)
        })?;

    Ok(Created(entry))
}

pub async fn get_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ActivityLog>, APIError> {
    Ok(Json(
        ActivityLogsRepo::new(state.database.clone())
            .get(id)
            .await?,
    ))
}
