use serde::Deserialize;

use crate::services::credentials::DEFAULT_COST;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database_url: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_server_ip")]
    pub server_ip: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    pub jwt_secret: String,
    #[serde(default = "default_jwt_key_id")]
    pub jwt_key_id: String,
    /// `kid:secret` entries for keys that still verify but no longer sign.
    #[serde(default)]
    pub jwt_retired_keys: Vec<String>,
    #[serde(default = "default_jwt_expiry_hours")]
    pub jwt_expiry_hours: i64,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    #[serde(default = "default_admin_email")]
    pub admin_email: String,
    pub admin_password: Option<String>,

    pub tls_cert_path: Option<String>,
    pub tls_key_path: Option<String>,
}

fn default_port() -> u16 {
    8000
}
fn default_server_ip() -> String {
    "127.0.0.1".to_string()
}
fn default_max_connections() -> u32 {
    10
}
fn default_min_connections() -> u32 {
    2
}
fn default_jwt_key_id() -> String {
    "primary".to_string()
}
fn default_jwt_expiry_hours() -> i64 {
    24
}
fn default_bcrypt_cost() -> u32 {
    DEFAULT_COST
}
fn default_admin_email() -> String {
    "admin".to_string()
}

impl Config {
    pub fn load_envs() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Both paths, when TLS is configured.
    pub fn tls_paths(&self) -> Option<(&str, &str)> {
        match (&self.tls_cert_path, &self.tls_key_path) {
            (Some(cert), Some(key)) => Some((cert.as_str(), key.as_str())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, envy::Error> {
        envy::from_iter(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    #[test]
    fn defaults_fill_optional_settings() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/saaskit"),
            ("JWT_SECRET", "secret"),
        ])
        .unwrap();

        assert_eq!(config.port, 8000);
        assert_eq!(config.jwt_key_id, "primary");
        assert!(config.jwt_retired_keys.is_empty());
        assert_eq!(config.jwt_expiry_hours, 24);
        assert_eq!(config.bcrypt_cost, DEFAULT_COST);
        assert_eq!(config.admin_email, "admin");
        assert!(config.admin_password.is_none());
        assert!(config.tls_paths().is_none());
    }

    #[test]
    fn retired_keys_are_comma_separated() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/saaskit"),
            ("JWT_SECRET", "secret"),
            ("JWT_RETIRED_KEYS", "2025:old,2024:older"),
        ])
        .unwrap();

        assert_eq!(config.jwt_retired_keys, vec!["2025:old", "2024:older"]);
    }

    #[test]
    fn signing_secret_is_required() {
        assert!(load(&[("DATABASE_URL", "postgres://localhost/saaskit")]).is_err());
    }
}
