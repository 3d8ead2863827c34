pub mod auth;
pub mod billing;
pub mod logs;
pub mod organizations;
pub mod resources;
pub mod roles;
pub mod users;

use std::sync::Arc;

use axum::{middleware, Router};

use crate::{
    core::state::AppState,
    middlewares::auth::{require_role, RoleGate},
    routes::{
        auth::{auth_routes, protected_auth_routes},
        billing::{feature_routes, plan_routes},
        logs::{activity_routes, audit_log_routes},
        organizations::organization_routes,
        resources::{
            api_key_routes, domain_routes, report_routes, seat_routes, subscription_routes,
            workflow_routes,
        },
        roles::{permission_routes, role_routes},
        users::{public_user_routes, user_routes},
    },
    utils::global_error_handler::global_error_handler,
};

/// Public routes need no token. Everything else sits behind the user-or-admin
/// gate; admin-only routes add the admin gate on top.
pub fn create_routers(state: Arc<AppState>) -> Router<()> {
    let member = RoleGate::user_or_admin(state.keys.clone());
    let admin = RoleGate::admin(state.keys.clone());

    let public_routes = Router::new()
        .nest("/auth", auth_routes())
        .nest("/users", public_user_routes());

    let protected_routes = Router::new()
        .nest("/auth", protected_auth_routes())
        .nest("/users", user_routes(admin.clone()))
        .nest("/roles", role_routes(admin.clone()))
        .nest("/permissions", permission_routes(admin.clone()))
        .nest("/organizations", organization_routes(admin.clone()))
        .nest("/domains", domain_routes())
        .nest("/seats", seat_routes())
        .nest("/subscriptions", subscription_routes())
        .nest("/plans", plan_routes(admin.clone()))
        .nest("/features", feature_routes(admin.clone()))
        .nest("/api-keys", api_key_routes())
        .nest("/workflows", workflow_routes())
        .nest("/reports", report_routes())
        .nest("/audit-logs", audit_log_routes(admin))
        .nest("/activity", activity_routes())
        .route_layer(middleware::from_fn_with_state(member, require_role));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(global_error_handler)
        .with_state(state)
}
