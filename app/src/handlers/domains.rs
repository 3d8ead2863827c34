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
        domain::{DomainChanges, Model as Domain, NewDomain},
    },
    repos::domains::DomainsRepo,
    services::audit,
    utils::{
        jwt::Claims,
        response::{APIError, APIResponse, Created},
    },
};

const RESOURCE: &str = "domain";

pub async fn create_domain(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewDomain>,
) -> Result<Created<Domain>, APIError> {
    let domain = DomainsRepo::new(state.database.clone())
        .create(payload)
        .await
        .map_err(|e| {
            error!("Failed to create domain: {}", e);
            APIError::from(e)
        })?;

    audit::record(
        &state.database,
        claims.id,
        domain.organization_id,
        "create",
        RESOURCE,
        domain.id,
        audit::snapshot(&domain),
    )
    .await;

    Ok(Created(domain))
}

pub async fn get_domain(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Domain>, APIError> {
    Ok(Json(DomainsRepo::new(state.database.clone()).get(id).await?))
}

pub async fn update_domain(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<DomainChanges>,
) -> Result<Json<Domain>, APIError> {
    let domains_repo = DomainsRepo::new(state.database.clone());
    let before = domains_repo.get(id).await?;
    let after = domains_repo.update(id, payload).await?;

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

pub async fn delete_domain(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> Result<APIResponse, APIError> {
    let domains_repo = DomainsRepo::new(state.database.clone());
    let domain = domains_repo.get(id).await?;
    domains_repo.soft_delete(id).await?;

    audit::record(
        &state.database,
        claims.id,
        domain.organization_id,
        "delete",
        RESOURCE,
        id,
        AuditChanges::default(),
    )
    .await;

    Ok(APIResponse::NoContent)
}
