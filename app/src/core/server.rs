use anyhow::Result;
use std::sync::Arc;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::{
    config::config::Config,
    core::state::AppState,
    database::{
        connect::{connect_database, run_migrations},
        seed::seed_defaults,
    },
    routes::create_routers,
};

/// Router with the request-wide layers applied, over an already prepared
/// state.
pub fn build_app(state: AppState) -> Router<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    create_routers(Arc::new(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn create_server(config: Config) -> Result<Router<()>> {
    let db_conn = connect_database(&config).await?;
    run_migrations(&db_conn).await?;
    seed_defaults(&db_conn, &config).await?;

    let state = AppState::new(db_conn, config)?;
    info!("Signing tokens with key '{}'", state.keys.active_kid());

    Ok(build_app(state))
}
