use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

pub use bcrypt::DEFAULT_COST;

/// Raw bytes behind verification tokens and API keys.
pub const TOKEN_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Hashing Error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Entropy Error: {0}")]
    Entropy(#[from] rand::Error),
}

/// bcrypt hash of `password`. Inputs longer than bcrypt's 72 byte limit are
/// rejected instead of truncated.
pub fn hash_password(password: &str, cost: u32) -> Result<String, CredentialError> {
    Ok(bcrypt::non_truncating_hash(password, cost)?)
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    if hash.is_empty() {
        return false;
    }

    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Takes the plaintext out of `password`, leaving it empty, and hashes it.
/// Returns `None` when there was nothing to hash.
pub fn seal_password(password: &mut String, cost: u32) -> Result<Option<String>, CredentialError> {
    let plaintext = std::mem::take(password);
    if plaintext.is_empty() {
        return Ok(None);
    }

    hash_password(&plaintext, cost).map(Some)
}

/// URL-safe token from the OS random source, unpadded base64 of
/// [`TOKEN_BYTES`] bytes. There is no fallback source.
pub fn random_token() -> Result<String, CredentialError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.try_fill_bytes(&mut bytes)?;

    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
