use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use tracing::{error, info};

use crate::{
    core::state::AppState,
    handlers::{include_deleted, ListQuery},
    models::{
        activity_log::Model as ActivityLog,
        api_key::Model as ApiKey,
        audit_log::{AuditChanges, Model as AuditLog},
        domain::Model as Domain,
        organization::{Model as Organization, NewOrganization, OrganizationChanges},
        report::Model as Report,
        role::ADMIN_ROLE,
        seat::Model as Seat,
        subscription::Model as Subscription,
        user::Model as User,
        workflow::Model as Workflow,
    },
    repos::{
        activity_logs::ActivityLogsRepo, api_keys::ApiKeysRepo, audit_logs::AuditLogsRepo,
        domains::DomainsRepo, organizations::OrganizationsRepo, reports::ReportsRepo,
        seats::SeatsRepo, subscriptions::SubscriptionsRepo, users::UsersRepo,
        workflows::WorkflowsRepo,
    },
    services::audit,
    utils::{
        jwt::Claims,
        response::{APIError, APIResponse, Created},
    },
};

const RESOURCE: &str = "organization";

/// The caller becomes the first member of the new organization.
pub async fn create_organization(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewOrganization>,
) -> Result<Created<Organization>, APIError> {
    let organization = OrganizationsRepo::new(state.database.clone())
        .create(payload, claims.id)
        .await
        .map_err(|e| {
            error!("Failed to create organization: {}", e);
            APIError::from(e)
        })?;
    info!("User {} created organization {}", claims.id, organization.id);

    audit::record(
        &state.database,
        claims.id,
        organization.id,
        "create",
        RESOURCE,
        organization.id,
        audit::snapshot(&organization),
    )
    .await;

    Ok(Created(organization))
}

/// Admins see every organization, everyone else the ones they belong to.
pub async fn list_organizations(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Organization>>, APIError> {
    if claims.role == ADMIN_ROLE {
        let organizations = OrganizationsRepo::new(state.database.clone()).list().await?;
        return Ok(Json(organizations));
    }

    let users_repo = UsersRepo::new(state.database.clone());
    let user = users_repo.get(claims.id).await?;

    Ok(Json(users_repo.organizations(&user).await?))
}

pub async fn get_organization(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Organization>, APIError> {
    Ok(Json(OrganizationsRepo::new(state.database.clone()).get(id).await?))
}

pub async fn update_organization(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<OrganizationChanges>,
) -> Result<Json<Organization>, APIError> {
    let organizations_repo = OrganizationsRepo::new(state.database.clone());
    let before = organizations_repo.get(id).await?;
    let after = organizations_repo.update(id, payload).await?;

    audit::record(
        &state.database,
        claims.id,
        id,
        "update",
        RESOURCE,
        id,
        audit::diff(&before, &after),
    )
    .await;

    Ok(Json(after))
}

pub async fn delete_organization(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> Result<APIResponse, APIError> {
    OrganizationsRepo::new(state.database.clone())
        .soft_delete(id)
        .await
        .map_err(|e| {
            error!("Failed to delete organization {}: {}", id, e);
            APIError::from(e)
        })?;

    audit::record(
        &state.database,
        claims.id,
        id,
        "delete",
        RESOURCE,
        id,
        AuditChanges::default(),
    )
    .await;

    Ok(APIResponse::NoContent)
}

pub async fn add_member(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path((id, user_id)): Path<(i32, i32)>,
) -> Result<APIResponse, APIError> {
    OrganizationsRepo::new(state.database.clone())
        .add_member(id, user_id)
        .await?;

    audit::record(
        &state.database,
        claims.id,
        id,
        "add_member",
        "user",
        user_id,
        AuditChanges::default(),
    )
    .await;

    Ok(APIResponse::OK)
}

pub async fn list_members(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<User>>, APIError> {
    Ok(Json(
        OrganizationsRepo::new(state.database.clone())
            .members(id)
            .await?,
    ))
}

pub async fn list_domains(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Domain>>, APIError> {
    let include_deleted = include_deleted(&claims, &query)?;
    let domains = DomainsRepo::new(state.database.clone())
        .list_for_organization(id, include_deleted)
        .await?;

    Ok(Json(domains))
}

pub async fn list_seats(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Seat>>, APIError> {
    let include_deleted = include_deleted(&claims, &query)?;
    let seats = SeatsRepo::new(state.database.clone())
        .list_for_organization(id, include_deleted)
        .await?;

    Ok(Json(seats))
}

pub async fn list_subscriptions(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Subscription>>, APIError> {
    let include_deleted = include_deleted(&claims, &query)?;
    let subscriptions = SubscriptionsRepo::new(state.database.clone())
        .list_for_organization(id, include_deleted)
        .await?;

    Ok(Json(subscriptions))
}

pub async fn list_api_keys(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ApiKey>>, APIError> {
    let include_deleted = include_deleted(&claims, &query)?;
    let api_keys = ApiKeysRepo::new(state.database.clone())
        .list_for_organization(id, include_deleted)
        .await?;

    Ok(Json(api_keys))
}

pub async fn list_workflows(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Workflow>>, APIError> {
    let include_deleted = include_deleted(&claims, &query)?;
    let workflows = WorkflowsRepo::new(state.database.clone())
        .list_for_organization(id, include_deleted)
        .await?;

    Ok(Json(workflows))
}

pub async fn list_reports(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Report>>, APIError> {
    let include_deleted = include_deleted(&claims, &query)?;
    let reports = ReportsRepo::new(state.database.clone())
        .list_for_organization(id, include_deleted)
        .await?;

    Ok(Json(reports))
}

pub async fn list_audit_logs(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<AuditLog>>, APIError> {
    Ok(Json(
        AuditLogsRepo::new(state.database.clone())
            .list_for_organization(id)
            .await?,
    ))
}

pub async fn list_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<ActivityLog>>, APIError> {
    Ok(Json(
        ActivityLogsRepo::new(state.database.clone())
            .list_for_organization(id)
            .await?,
    ))
}
