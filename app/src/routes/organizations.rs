use std::sync::Arc;

use axum::{
    handler::Handler,
    middleware,
    routing::{get, post},
    Router,
};

use crate::{
    core::state::AppState,
    handlers::organizations::{
        add_member, create_organization, delete_organization, get_organization, list_activity,
        list_api_keys, list_audit_logs, list_domains, list_members, list_organizations,
        list_reports, list_seats, list_subscriptions, list_workflows, update_organization,
    },
    middlewares::auth::{require_role, RoleGate},
};

pub fn organization_routes(admin: RoleGate) -> Router<Arc<AppState>> {
    let admin_only = middleware::from_fn_with_state(admin, require_role);

    Router::new()
        .route("/", post(create_organization).get(list_organizations))
        .route(
            "/:id",
            get(get_organization)
                .put(update_organization)
                .delete(delete_organization.layer(admin_only.clone())),
        )
        .route("/:id/members", get(list_members))
        .route("/:id/members/:user_id", post(add_member))
        .route("/:id/domains", get(list_domains))
        .route("/:id/seats", get(list_seats))
        .route("/:id/subscriptions", get(list_subscriptions))
        .route("/:id/api-keys", get(list_api_keys))
        .route("/:id/workflows", get(list_workflows))
        .route("/:id/reports", get(list_reports))
        .route("/:id/audit-logs", get(list_audit_logs.layer(admin_only)))
        .route("/:id/activity", get(list_activity))
}
