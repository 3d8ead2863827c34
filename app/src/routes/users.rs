use std::sync::Arc;

use axum::{
    handler::Handler,
    middleware,
    routing::{get, post},
    Router,
};

use crate::{
    core::state::AppState,
    handlers::users::{
        assign_user_role, create_user, delete_user, get_notification_preferences, get_user,
        grant_user_permission, list_user_activity, list_user_organizations,
        list_user_permissions, list_user_roles, list_users, update_notification_preferences,
        update_user, verify_email,
    },
    middlewares::auth::{require_role, RoleGate},
};

/// Sign-up and email verification.
pub fn public_user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_user))
        .route("/verify", post(verify_email))
}

pub fn user_routes(admin: RoleGate) -> Router<Arc<AppState>> {
    let admin_only = middleware::from_fn_with_state(admin, require_role);

    Router::new()
        .route("/", get(list_users))
        .route(
            "/:id",
            get(get_user)
                .put(update_user)
                .delete(delete_user.layer(admin_only.clone())),
        )
        .route("/:id/roles", get(list_user_roles))
        .route(
            "/:id/roles/:role_id",
            post(assign_user_role.layer(admin_only.clone())),
        )
        .route("/:id/permissions", get(list_user_permissions))
        .route(
            "/:id/permissions/:permission_id",
            post(grant_user_permission.layer(admin_only)),
        )
        .route("/:id/organizations", get(list_user_organizations))
        .route("/:id/activity", get(list_user_activity))
        .route(
            "/:id/notification-preferences",
            get(get_notification_preferences).put(update_notification_preferences),
        )
}
