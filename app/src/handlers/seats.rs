use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use tracing::{error, info};

use crate::{
    core::state::AppState,
    models::{
        audit_log::AuditChanges,
        role::Model as Role,
        seat::{Model as Seat, NewSeat, SeatChanges},
    },
    repos::seats::SeatsRepo,
    services::audit,
    utils::{
        jwt::Claims,
        response::{APIError, APIResponse, Created},
    },
};

const RESOURCE: &str = "seat";

pub async fn create_seat(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewSeat>,
) -> Result<Created<Seat>, APIError> {
    let seat = SeatsRepo::new(state.database.clone())
        .create(payload)
        .await
        .map_err(|e| {
            error!("Failed to create seat: {}", e);
            APIError::from(e)
        })?;
    info!(
        "Seat {} for user {} in organization {}",
        seat.id, seat.user_id, seat.organization_id
    );

    audit::record(
        &state.database,
        claims.id,
        seat.organization_id,
        "create",
        RESOURCE,
        seat.id,
        audit::snapshot(&seat),
    )
    .await;

    Ok(Created(seat))
}

pub async fn get_seat(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Seat>, APIError> {
    Ok(Json(SeatsRepo::new(state.database.clone()).get(id).await?))
}

pub async fn update_seat(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<SeatChanges>,
) -> Result<Json<Seat>, APIError> {
    let seats_repo = SeatsRepo::new(state.database.clone());
    let before = seats_repo.get(id).await?;
    let after = seats_repo.update(id, payload).await?;

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

pub async fn delete_seat(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> Result<APIResponse, APIError> {
    let seats_repo = SeatsRepo::new(state.database.clone());
    let seat = seats_repo.get(id).await?;
    seats_repo.soft_delete(id).await?;

    audit::record(
        &state.database,
        claims.id,
        seat.organization_id,
        "delete",
        RESOURCE,
        id,
        AuditChanges::default(),
    )
    .await;

    Ok(APIResponse::NoContent)
}

pub async fn list_seat_roles(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<Role>>, APIError> {
    Ok(Json(SeatsRepo::new(state.database.clone()).roles(id).await?))
}

pub async fn assign_seat_role(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path((id, role_id)): Path<(i32, i32)>,
) -> Result<APIResponse, APIError> {
    let seats_repo = SeatsRepo::new(state.database.clone());
    let seat = seats_repo.get(id).await?;
    seats_repo.assign_role(id, role_id).await?;

    audit::record(
        &state.database,
        claims.id,
        seat.organization_id,
        "assign_role",
        RESOURCE,
        id,
        AuditChanges::default().field("role_id", serde_json::Value::Null, role_id),
    )
    .await;

    Ok(APIResponse::OK)
}
