use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    config::config::Config,
    utils::jwt::{KeyError, KeyRing},
};

#[derive(Clone, Debug)]
pub struct AppState {
    pub database: DatabaseConnection,
    pub config: Config,
    pub keys: Arc<KeyRing>,
}

impl AppState {
    pub fn new(database: DatabaseConnection, config: Config) -> Result<Self, KeyError> {
        let keys = KeyRing::from_config(
            &config.jwt_key_id,
            &config.jwt_secret,
            &config.jwt_retired_keys,
        )?;

        Ok(Self {
            database,
            config,
            keys: Arc::new(keys),
        })
    }
}
