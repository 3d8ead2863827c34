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
        workflow::{Model as Workflow, NewWorkflow, WorkflowChanges},
    },
    repos::workflows::WorkflowsRepo,
    services::audit,
    utils::{
        jwt::Claims,
        response::{APIError, APIResponse, Created},
    },
};

const RESOURCE: &str = "workflow";

pub async fn create_workflow(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewWorkflow>,
) -> Result<Created<Workflow>, APIError> {
    let workflow = WorkflowsRepo::new(state.database.clone())
        .create(payload, claims.id)
        .await
        .map_err(|e| {
            error!("Failed to create workflow: {}", e);
            APIError::from(e)
        })?;

    audit::record(
        &state.database,
        claims.id,
        workflow.organization_id,
        "create",
        RESOURCE,
        workflow.id,
        audit::snapshot(&workflow),
    )
    .await;

    Ok(Created(workflow))
}

pub async fn get_workflow(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Workflow>, APIError> {
    Ok(Json(WorkflowsRepo::new(state.database.clone()).get(id).await?))
}

pub async fn update_workflow(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<WorkflowChanges>,
) -> Result<Json<Workflow>, APIError> {
    let workflows_repo = WorkflowsRepo::new(state.database.clone());
    let before = workflows_repo.get(id).await?;
    let after = workflows_repo.update(id, payload).await?;

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

pub async fn delete_workflow(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> Result<APIResponse, APIError> {
    let workflows_repo = WorkflowsRepo::new(state.database.clone());
    let workflow = workflows_repo.get(id).await?;
    workflows_repo.soft_delete(id).await?;

    audit::record(
        &state.database,
        claims.id,
        workflow.organization_id,
        "delete",
        RESOURCE,
        id,
        AuditChanges::default(),
    )
    .await;

    Ok(APIResponse::NoContent)
}
