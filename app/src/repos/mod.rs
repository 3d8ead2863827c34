pub mod activity_logs;
pub mod api_keys;
pub mod audit_logs;
pub mod domains;
pub mod notification_preferences;
pub mod organizations;
pub mod permissions;
pub mod plans;
pub mod roles;
pub mod scope;
pub mod seats;
pub mod subscriptions;
pub mod users;
pub mod workflows;
pub mod reports;

use sea_orm::DbErr;
use thiserror::Error;

use crate::{
    models::{seat::SeatTransitionError, workflow::WorkflowError},
    services::credentials::CredentialError,
};

/// Failure of a write path: the persistence error, or one of the invariant
/// checks that run before anything reaches the database.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Database Error: {0}")]
    Db(#[from] DbErr),

    #[error("Credential Error: {0}")]
    Credential(#[from] CredentialError),

    #[error("Invalid Input: {0}")]
    Invalid(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<SeatTransitionError> for WriteError {
    fn from(err: SeatTransitionError) -> Self {
        Self::Conflict(err.to_string())
    }
}

impl From<WorkflowError> for WriteError {
    fn from(err: WorkflowError) -> Self {
        Self::Invalid(err.to_string())
    }
}
