use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(id: i32, role: &str, permissions: Vec<String>, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            id,
            role: role.to_string(),
            permissions,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("Key id must not be empty")]
    EmptyKeyId,

    #[error("Secret for key '{0}' must not be empty")]
    EmptySecret(String),

    #[error("Key id '{0}' is used more than once")]
    DuplicateKeyId(String),

    #[error("Malformed key entry '{0}', expected kid:secret")]
    Malformed(String),
}

#[derive(Clone)]
pub struct SigningKey {
    kid: String,
    secret: Vec<u8>,
}

impl SigningKey {
    pub fn new(kid: &str, secret: &str) -> Result<Self, KeyError> {
        if kid.is_empty() {
            return Err(KeyError::EmptyKeyId);
        }
        if secret.is_empty() {
            return Err(KeyError::EmptySecret(kid.to_string()));
        }

        Ok(Self {
            kid: kid.to_string(),
            secret: secret.as_bytes().to_vec(),
        })
    }

    /// Parses a `kid:secret` entry. The secret may itself contain ':'.
    pub fn parse(entry: &str) -> Result<Self, KeyError> {
        let (kid, secret) = entry
            .trim()
            .split_once(':')
            .ok_or_else(|| KeyError::Malformed(entry.to_string()))?;

        Self::new(kid, secret)
    }

    pub fn kid(&self) -> &str {
        &self.kid
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.secret)
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("kid", &self.kid)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Keys the server signs and verifies bearer tokens with. New tokens are
/// always signed with the active key; retired keys only verify, so tokens
/// issued before a rotation stay valid until they expire.
#[derive(Debug, Clone)]
pub struct KeyRing {
    active: SigningKey,
    retired: Vec<SigningKey>,
}

impl KeyRing {
    pub fn new(active: SigningKey) -> Self {
        Self {
            active,
            retired: Vec::new(),
        }
    }

    pub fn with_retired(mut self, key: SigningKey) -> Result<Self, KeyError> {
        if self.keys().any(|k| k.kid == key.kid) {
            return Err(KeyError::DuplicateKeyId(key.kid));
        }

        self.retired.push(key);
        Ok(self)
    }

    pub fn from_config(kid: &str, secret: &str, retired: &[String]) -> Result<Self, KeyError> {
        let mut ring = Self::new(SigningKey::new(kid, secret)?);
        for entry in retired.iter().filter(|e| !e.trim().is_empty()) {
            ring = ring.with_retired(SigningKey::parse(entry)?)?;
        }

        Ok(ring)
    }

    pub fn active_kid(&self) -> &str {
        self.active.kid()
    }

    fn keys(&self) -> impl Iterator<Item = &SigningKey> {
        std::iter::once(&self.active).chain(self.retired.iter())
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some(self.active.kid.clone());

        encode(
            &header,
            claims,
            &EncodingKey::from_secret(&self.active.secret),
        )
    }

    pub fn issue(
        &self,
        id: i32,
        role: &str,
        permissions: Vec<String>,
        expiry_hours: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        self.sign(&Claims::new(id, role, permissions, Duration::hours(expiry_hours)))
    }

    /// Checks signature and expiry. A `kid` header selects the key; tokens
    /// without one are tried against every key in the ring.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let header = decode_header(token)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.set_required_spec_claims(&["exp"]);
        validation.leeway = 0;

        if let Some(kid) = header.kid {
            let key = self
                .keys()
                .find(|k| k.kid == kid)
                .ok_or(ErrorKind::InvalidSignature)?;

            return decode::<Claims>(token, &key.decoding_key(), &validation).map(|t| t.claims);
        }

        let mut last_error = jsonwebtoken::errors::Error::from(ErrorKind::InvalidSignature);
        for key in self.keys() {
            match decode::<Claims>(token, &key.decoding_key(), &validation) {
                Ok(data) => return Ok(data.claims),
                Err(e) => last_error = e,
            }
        }

        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(kid: &str, secret: &str) -> KeyRing {
        KeyRing::new(SigningKey::new(kid, secret).unwrap())
    }

    fn claims() -> Claims {
        Claims::new(5, "user", vec!["reports:read".to_string()], Duration::hours(1))
    }

    #[test]
    fn issued_tokens_verify() {
        let keys = ring("primary", "first-secret");
        let token = keys.issue(5, "admin", Vec::new(), 1).unwrap();

        let verified = keys.verify(&token).unwrap();
        assert_eq!(verified.id, 5);
        assert_eq!(verified.role, "admin");
    }

    #[test]
    fn retired_keys_still_verify() {
        let old = ring("2025", "old-secret");
        let token = old.sign(&claims()).unwrap();

        let rotated = ring("2026", "new-secret")
            .with_retired(SigningKey::new("2025", "old-secret").unwrap())
            .unwrap();

        assert_eq!(rotated.verify(&token).unwrap().id, 5);
        assert_eq!(rotated.active_kid(), "2026");
    }

    #[test]
    fn unknown_kid_is_rejected() {
        let token = ring("other", "first-secret").sign(&claims()).unwrap();
        assert!(ring("primary", "first-secret").verify(&token).is_err());
    }

    #[test]
    fn tokens_without_kid_try_every_key() {
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims(),
            &EncodingKey::from_secret(b"old-secret"),
        )
        .unwrap();

        let keys = ring("primary", "new-secret")
            .with_retired(SigningKey::new("old", "old-secret").unwrap())
            .unwrap();
        assert_eq!(keys.verify(&token).unwrap().id, 5);

        assert!(ring("primary", "new-secret").verify(&token).is_err());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let keys = ring("primary", "first-secret");
        let expired = Claims::new(5, "user", Vec::new(), Duration::hours(-1));
        let token = keys.sign(&expired).unwrap();

        let err = keys.verify(&token).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ExpiredSignature);
    }

    #[test]
    fn tampered_and_foreign_tokens_are_rejected() {
        let keys = ring("primary", "first-secret");
        let token = keys.sign(&claims()).unwrap();

        let forged = keys
            .sign(&Claims::new(6, "admin", Vec::new(), Duration::hours(1)))
            .unwrap();
        let signature = token.rsplit('.').next().unwrap();
        let forged_body = forged.rsplit_once('.').unwrap().0;
        let tampered = format!("{}.{}", forged_body, signature);
        assert!(keys.verify(&tampered).is_err());

        assert!(ring("primary", "second-secret").verify(&token).is_err());
        assert!(keys.verify("").is_err());
    }

    #[test]
    fn config_entries_are_parsed() {
        let keys = KeyRing::from_config(
            "primary",
            "first-secret",
            &["old:with:colons".to_string(), " ".to_string()],
        )
        .unwrap();
        let token = ring("old", "with:colons").sign(&claims()).unwrap();
        assert!(keys.verify(&token).is_ok());

        let err = KeyRing::from_config("primary", "s", &["nocolon".to_string()]).unwrap_err();
        assert_eq!(err, KeyError::Malformed("nocolon".to_string()));

        let err = KeyRing::from_config("primary", "s", &["primary:x".to_string()]).unwrap_err();
        assert_eq!(err, KeyError::DuplicateKeyId("primary".to_string()));

        assert_eq!(
            KeyRing::from_config("primary", "", &[]).unwrap_err(),
            KeyError::EmptySecret("primary".to_string())
        );
    }

    #[test]
    fn debug_output_hides_secrets() {
        let rendered = format!("{:?}", ring("primary", "super-secret-value"));
        assert!(rendered.contains("primary"));
        assert!(!rendered.contains("super-secret-value"));
    }
}
