use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use tracing::error;

use crate::{
    core::state::AppState,
    models::{
        audit_log::AuditChanges,
        report::{Model as Report, NewReport, ReportChanges},
    },
    repos::reports::ReportsRepo,
    services::audit,
    utils::{
        jwt::Claims,
        response::{APIError, APIResponse, Created},
    },
};

const RESOURCE: &str = "report";

pub async fn create_report(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewReport>,
) -> Result<Created<Report>, APIError> {
    let report = ReportsRepo::new(state.database.clone())
        .create(payload, claims.id)
        .await
        .map_err(|e| {
            error!("Failed to create report: {}", e);
            APIError::from(e)
        })?;

    audit::record(
        &state.database,
        claims.id,
        report.organization_id,
        "create",
        RESOURCE,
        report.id,
        audit::snapshot(&report),
    )
    .await;

    Ok(Created(report))
}

pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Report>, APIError> {
    Ok(Json(ReportsRepo::new(state.database.clone()).get(id).await?))
}

pub async fn update_report(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<ReportChanges>,
) -> Result<Json<Report>, APIError> {
    let reports_repo = ReportsRepo::new(state.database.clone());
    let before = reports_repo.get(id).await?;
    let after = reports_repo.update(id, payload).await?;

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

pub async fn delete_report(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> Result<APIResponse, APIError> {
    let reports_repo = ReportsRepo::new(state.database.clone());
    let report = reports_repo.get(id).await?;
    reports_repo.soft_delete(id).await?;

    audit::record(
        &state.database,
        claims.id,
        report.organization_id,
        "delete",
        RESOURCE,
        id,
        AuditChanges::default(),
    )
    .await;

    Ok(APIResponse::NoContent)
}
