use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::{
    core::state::AppState,
    models::user::Model as User,
    repos::users::UsersRepo,
    services::auth::{login as start_session, LoginError, Session},
    utils::{jwt::Claims, response::APIError},
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    user: User,
    role: String,
    permissions: Vec<String>,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Session>, APIError> {
    let session = start_session(
        &state.database,
        &state.keys,
        &payload.email,
        &payload.password,
        state.config.jwt_expiry_hours,
    )
    .await
    .map_err(|e| match e {
        LoginError::InvalidCredentials => {
            warn!("Login rejected for {}", payload.email);
            APIError::UnAuthorized
        }
        LoginError::Db(e) => {
            error!("Login failed: {}", e);
            APIError::from(e)
        }
        LoginError::Token(e) => {
            error!("Failed to issue token: {}", e);
            APIError::InternalServerError("Failed to issue token".to_string())
        }
    })?;

    Ok(Json(session))
}

pub async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<MeResponse>, APIError> {
    let user = UsersRepo::new(state.database.clone()).get(claims.id).await?;

    Ok(Json(MeResponse {
        user,
        role: claims.role,
        permissions: claims.permissions,
    }))
}
