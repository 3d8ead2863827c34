use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{
    core::state::AppState,
    handlers::logs::{create_activity, create_audit_log, get_activity, get_audit_log},
    middlewares::auth::{require_role, RoleGate},
};

/// Audit entries are written by the handlers themselves; direct appends and
/// reads are admin only.
pub fn audit_log_routes(admin: RoleGate) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_audit_log))
        .route("/:id", get(get_audit_log))
        .route_layer(middleware::from_fn_with_state(admin, require_role))
}

pub fn activity_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_activity))
        .route("/:id", get(get_activity))
}
