use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::{
    core::state::AppState,
    handlers::roles::{
        create_permission, create_role, delete_permission, delete_role, get_role,
        grant_role_permission, list_permissions, list_role_permissions, list_roles,
        update_role,
    },
    middlewares::auth::{require_role, RoleGate},
};

/// Role and permission management is admin-only end to end.
pub fn role_routes(admin: RoleGate) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_role).get(list_roles))
        .route("/:id", get(get_role).put(update_role).delete(delete_role))
        .route("/:id/permissions", get(list_role_permissions))
        .route("/:id/permissions/:permission_id", post(grant_role_permission))
        .route_layer(middleware::from_fn_with_state(admin, require_role))
}

pub fn permission_routes(admin: RoleGate) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_permission).get(list_permissions))
        .route("/:id", delete(delete_permission))
        .route_layer(middleware::from_fn_with_state(admin, require_role))
}
