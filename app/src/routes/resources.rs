//! Organization-owned resources. Each gets create plus get/update/delete by id.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    core::state::AppState,
    handlers::{
        api_keys::{create_api_key, delete_api_key, get_api_key, update_api_key},
        domains::{create_domain, delete_domain, get_domain, update_domain},
        reports::{create_report, delete_report, get_report, update_report},
        seats::{
            assign_seat_role, create_seat, delete_seat, get_seat, list_seat_roles, update_seat,
        },
        subscriptions::{
            create_subscription, delete_subscription, get_subscription, list_transactions,
            record_transaction, update_subscription,
        },
        workflows::{create_workflow, delete_workflow, get_workflow, update_workflow},
    },
};

pub fn domain_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", post(create_domain)).route(
        "/:id",
        get(get_domain).put(update_domain).delete(delete_domain),
    )
}

pub fn seat_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_seat))
        .route("/:id", get(get_seat).put(update_seat).delete(delete_seat))
        .route("/:id/roles", get(list_seat_roles))
        .route("/:id/roles/:role_id", post(assign_seat_role))
}

pub fn subscription_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_subscription))
        .route(
            "/:id",
            get(get_subscription)
                .put(update_subscription)
                .delete(delete_subscription),
        )
        .route(
            "/:id/transactions",
            post(record_transaction).get(list_transactions),
        )
}

pub fn api_key_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", post(create_api_key)).route(
        "/:id",
        get(get_api_key).put(update_api_key).delete(delete_api_key),
    )
}

pub fn workflow_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", post(create_workflow)).route(
        "/:id",
        get(get_workflow).put(update_workflow).delete(delete_workflow),
    )
}

pub fn report_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", post(create_report)).route(
        "/:id",
        get(get_report).put(update_report).delete(delete_report),
    )
}
