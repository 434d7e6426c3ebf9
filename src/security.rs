use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::constants::{ACCESS_TOKEN_BYTES, EMBED_HEIGHT, EMBED_WIDTH};
use crate::error::{AppError, Result};

// =============================================================================
// Passwords
// =============================================================================

/// Hash a password into an Argon2id PHC string with a random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Outcome of checking a password against its stored form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCheck {
    Valid,
    /// Matched a plaintext entry; the caller should store a hash instead
    ValidLegacy,
    Invalid,
}

/// Check a password against a stored Argon2 hash
///
/// Anything that is not an Argon2 PHC string is treated as a plaintext
/// password left over from before hashing was introduced. That includes
/// plaintext that happens to look like another scheme's PHC string.
pub fn verify_password(password: &str, stored: &str) -> PasswordCheck {
    match PasswordHash::new(stored) {
        Ok(parsed) if parsed.algorithm.as_str().starts_with("argon2") => {
            if Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
            {
                PasswordCheck::Valid
            } else {
                PasswordCheck::Invalid
            }
        }
        _ if stored == password => PasswordCheck::ValidLegacy,
        _ => PasswordCheck::Invalid,
    }
}

// =============================================================================
// Login tokens
// =============================================================================

/// Claims carried by a login token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issue an HS256 token for `username` valid for `ttl_hours`
pub fn issue_token(username: &str, secret: &str, ttl_hours: i64) -> Result<String> {
    let now = Utc::now();
    let claims = Claims {
        username: username.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(ttl_hours)).timestamp(),
    };

    Ok(jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Verify signature and expiry of a login token
pub fn verify_token(token: &str, secret: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::TokenExpired,
        _ => AppError::InvalidToken,
    })
}

// =============================================================================
// Camera access tokens
// =============================================================================

/// Random opaque token for a camera viewer link
pub fn generate_access_token() -> String {
    let mut bytes = [0u8; ACCESS_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Markup embedding the external single-camera viewer
pub fn embed_iframe(embed_base_url: &str, token: &str) -> String {
    format!(
        r#"<iframe src="{embed_base_url}/embed_single?token={token}" width="{EMBED_WIDTH}" height="{EMBED_HEIGHT}" style="border:none;"></iframe>"#
    )
}
