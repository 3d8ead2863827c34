use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    core::state::AppState,
    handlers::auth::{get_me, login},
};

pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new().route("/login", post(login))
}

pub fn protected_auth_routes() -> Router<Arc<AppState>> {
    Router::new().route("/me", get(get_me))
}
