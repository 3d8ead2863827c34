use std::sync::Arc;

use axum::{
    handler::Handler,
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::{
    core::state::AppState,
    handlers::plans::{
        add_plan_feature, create_feature, create_plan, delete_feature, delete_plan, get_plan,
        list_features, list_plan_features, list_plans, update_plan,
    },
    middlewares::auth::{require_role, RoleGate},
};

/// Anyone signed in can browse plans and features; changing them is
/// admin-only.
pub fn plan_routes(admin: RoleGate) -> Router<Arc<AppState>> {
    let admin_only = middleware::from_fn_with_state(admin, require_role);

    Router::new()
        .route(
            "/",
            post(create_plan.layer(admin_only.clone())).get(list_plans),
        )
        .route(
            "/:id",
            get(get_plan)
                .put(update_plan.layer(admin_only.clone()))
                .delete(delete_plan.layer(admin_only.clone())),
        )
        .route("/:id/features", get(list_plan_features))
        .route(
            "/:id/features/:feature_id",
            post(add_plan_feature.layer(admin_only)),
        )
}

pub fn feature_routes(admin: RoleGate) -> Router<Arc<AppState>> {
    let admin_only = middleware::from_fn_with_state(admin, require_role);

    Router::new()
        .route(
            "/",
            post(create_feature.layer(admin_only.clone())).get(list_features),
        )
        .route("/:id", delete(delete_feature.layer(admin_only)))
}
