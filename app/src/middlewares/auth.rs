use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::warn;

use crate::{
    models::role::{ADMIN_ROLE, USER_ROLE},
    utils::{
        jwt::{Claims, KeyRing},
        response::APIError,
    },
};

/// Pulls the token out of an `Authorization` value. Anything other than
/// exactly `Bearer <token>` yields an empty token, which never verifies.
pub fn extract_token(header: Option<&str>) -> &str {
    let Some(value) = header else {
        return "";
    };

    let segments: Vec<&str> = value.split(' ').collect();
    match segments.as_slice() {
        ["Bearer", token] => *token,
        _ => "",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleRule {
    Exact(String),
    UserOrAdmin,
}

impl RoleRule {
    pub fn admits(&self, role: &str) -> bool {
        match self {
            Self::Exact(required) => role == required,
            Self::UserOrAdmin => role == USER_ROLE || role == ADMIN_ROLE,
        }
    }
}

#[derive(Debug, Error)]
pub enum GateError {
    #[error("Missing or malformed authorization header")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Role '{0}' is not allowed here")]
    RoleMismatch(String),
}

/// Verifies the bearer token and checks its role claim. The role graph in
/// the database is not consulted.
pub fn authorize(keys: &KeyRing, rule: &RoleRule, header: Option<&str>) -> Result<Claims, GateError> {
    let token = extract_token(header);
    if token.is_empty() {
        return Err(GateError::MissingToken);
    }

    let claims = keys.verify(token)?;
    if !rule.admits(&claims.role) {
        return Err(GateError::RoleMismatch(claims.role));
    }

    Ok(claims)
}

#[derive(Debug, Clone)]
pub struct RoleGate {
    pub keys: Arc<KeyRing>,
    pub rule: RoleRule,
}

impl RoleGate {
    pub fn admin(keys: Arc<KeyRing>) -> Self {
        Self {
            keys,
            rule: RoleRule::Exact(ADMIN_ROLE.to_string()),
        }
    }

    pub fn user_or_admin(keys: Arc<KeyRing>) -> Self {
        Self {
            keys,
            rule: RoleRule::UserOrAdmin,
        }
    }
}

/// Rejects the request with 401 unless the gate admits it. Admitted
/// requests carry the verified [`Claims`] as an extension.
pub async fn require_role(
    State(gate): State<RoleGate>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match authorize(&gate.keys, &gate.rule, auth_header) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            warn!("Auth Failed, {}", e);
            APIError::UnAuthorized.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::jwt::SigningKey;

    fn keys() -> KeyRing {
        KeyRing::new(SigningKey::new("primary", "gate-secret").unwrap())
    }

    fn bearer(role: &str) -> String {
        format!("Bearer {}", keys().issue(1, role, Vec::new(), 1).unwrap())
    }

    #[test]
    fn header_must_be_exactly_two_segments() {
        assert_eq!(extract_token(Some("Bearer abc")), "abc");
        assert_eq!(extract_token(Some("Bearer")), "");
        assert_eq!(extract_token(Some("Bearer  abc")), "");
        assert_eq!(extract_token(Some("Bearer abc def")), "");
        assert_eq!(extract_token(Some("Basic abc")), "");
        assert_eq!(extract_token(Some("bearer abc")), "");
        assert_eq!(extract_token(None), "");
    }

    #[test]
    fn exact_rule_requires_the_named_role() {
        let rule = RoleRule::Exact(ADMIN_ROLE.to_string());

        assert_eq!(authorize(&keys(), &rule, Some(&bearer("admin"))).unwrap().role, "admin");
        assert!(matches!(
            authorize(&keys(), &rule, Some(&bearer("user"))),
            Err(GateError::RoleMismatch(role)) if role == "user"
        ));
    }

    #[test]
    fn user_or_admin_rejects_other_roles() {
        let rule = RoleRule::UserOrAdmin;

        assert!(authorize(&keys(), &rule, Some(&bearer("user"))).is_ok());
        assert!(authorize(&keys(), &rule, Some(&bearer("admin"))).is_ok());
        assert!(authorize(&keys(), &rule, Some(&bearer("auditor"))).is_err());
    }

    #[test]
    fn malformed_headers_never_reach_verification() {
        let header = bearer("admin").replacen("Bearer ", "Token ", 1);

        assert!(matches!(
            authorize(&keys(), &RoleRule::UserOrAdmin, Some(&header)),
            Err(GateError::MissingToken)
        ));
        assert!(matches!(
            authorize(&keys(), &RoleRule::UserOrAdmin, None),
            Err(GateError::MissingToken)
        ));
    }

    #[test]
    fn foreign_signatures_are_invalid() {
        let foreign = KeyRing::new(SigningKey::new("primary", "other-secret").unwrap());
        let header = format!("Bearer {}", foreign.issue(1, "admin", Vec::new(), 1).unwrap());

        assert!(matches!(
            authorize(&keys(), &RoleRule::UserOrAdmin, Some(&header)),
            Err(GateError::InvalidToken(_))
        ));
    }
}
