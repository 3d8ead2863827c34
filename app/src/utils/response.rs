use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use tracing::error;

use crate::{repos::WriteError, services::credentials::CredentialError};

pub enum APIResponse {
    OK,
    NoContent,
    NotFound(String),
}

impl IntoResponse for APIResponse {
    fn into_response(self) -> Response {
        match self {
            Self::OK => (
                StatusCode::OK,
                Json(serde_json::json!({"status": "ok"})),
            )
                .into_response(),
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
            Self::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"status": "error", "details": msg})),
            )
                .into_response(),
        }
    }
}

/// `201 Created` with the new resource as the body.
pub struct Created<T>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

#[derive(Debug)]
pub enum APIError {
    BadRequest(String),
    UnAuthorized,
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    InternalServerError(String),
}

impl IntoResponse for APIError {
    fn into_response(self) -> Response {
        let (status, details) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::UnAuthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Self::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (
            status,
            Json(serde_json::json!({"status": "error", "details": details})),
        )
            .into_response()
    }
}

/// Constraint violations come back as a generic conflict; the driver's
/// message never reaches the client.
impl From<DbErr> for APIError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                return Self::Conflict("Resource already exists".to_string())
            }
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                return Self::Conflict("Referenced resource is missing or still in use".to_string())
            }
            _ => {}
        }

        match err {
            DbErr::RecordNotFound(msg) => Self::NotFound(msg),
            DbErr::RecordNotUpdated => Self::NotFound("Record not found".to_string()),
            other => {
                error!("Database Error: {}", other);
                Self::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

impl From<CredentialError> for APIError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Hash(e) => Self::BadRequest(format!("Password rejected: {}", e)),
            CredentialError::Entropy(e) => {
                error!("Random source failed: {}", e);
                Self::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

impl From<WriteError> for APIError {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::Db(e) => e.into(),
            WriteError::Credential(e) => e.into(),
            WriteError::Invalid(msg) => Self::BadRequest(msg),
            WriteError::Conflict(msg) => Self::Conflict(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_records_map_to_not_found() {
        let err: APIError = DbErr::RecordNotFound("users 3 not found".to_string()).into();
        assert!(matches!(err, APIError::NotFound(msg) if msg == "users 3 not found"));
    }

    #[test]
    fn other_database_errors_stay_generic() {
        let err: APIError = DbErr::Custom("connection reset by peer".to_string()).into();
        match err {
            APIError::InternalServerError(msg) => assert!(!msg.contains("connection")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn write_errors_keep_their_category() {
        let err: APIError = WriteError::Conflict("reserved".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);

        let err: APIError = WriteError::Invalid("bad".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
