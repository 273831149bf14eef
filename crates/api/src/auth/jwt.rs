//! Access and refresh tokens.
//!
//! Access tokens are HS256 JWTs carrying the caller's id and role; the queue
//! services consume nothing else about the caller. Refresh tokens are 32
//! random bytes, hex-encoded. Only their SHA-256 digest is stored, so a
//! database leak does not hand out live sessions.

use antrean_core::types::{DbId, Timestamp};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::env_parse;

/// Clock skew tolerated when checking `exp`, in seconds.
const EXP_LEEWAY_SECS: u64 = 30;

/// JWT payload of an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    /// `"user"` or `"company"`.
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Signing secret and token lifetimes.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    /// Load from `JWT_SECRET` (required), `JWT_ACCESS_EXPIRY_MINS` (default
    /// 15) and `JWT_REFRESH_EXPIRY_DAYS` (default 7).
    ///
    /// # Panics
    ///
    /// Panics if the secret is missing or empty, or a lifetime does not parse.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        Self {
            secret,
            access_token_expiry_mins: env_parse("JWT_ACCESS_EXPIRY_MINS", 15),
            refresh_token_expiry_days: env_parse("JWT_REFRESH_EXPIRY_DAYS", 7),
        }
    }
}

/// Everything login and refresh hand out, plus what must be persisted.
#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub access_expires_in: i64,
    /// Plaintext refresh token; goes to the client only.
    pub refresh_token: String,
    /// SHA-256 of `refresh_token`; goes to `user_sessions`.
    pub refresh_token_hash: String,
    pub refresh_expires_at: Timestamp,
}

/// Issue a fresh access token and refresh token for a user.
pub fn issue_token_pair(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<TokenPair, jsonwebtoken::errors::Error> {
    let access_token = generate_access_token(user_id, role, config)?;
    let (refresh_token, refresh_token_hash) = generate_refresh_token();

    Ok(TokenPair {
        access_token,
        access_expires_in: config.access_token_expiry_mins * 60,
        refresh_token,
        refresh_token_hash,
        refresh_expires_at: Utc::now() + Duration::days(config.refresh_token_expiry_days),
    })
}

/// Sign an access token for `user_id` with `role`.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: now + config.access_token_expiry_mins * 60,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature and expiry, returning the claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = EXP_LEEWAY_SECS;
    // `sub` is numeric here; jsonwebtoken's required-claim check only
    // recognises a string `sub`, so presence is enforced by `Claims` itself.
    validation.set_required_spec_claims(&["exp"]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}

/// Generate a refresh token, returning `(plaintext, sha256_hex)`.
pub fn generate_refresh_token() -> (String, String) {
    let bytes: [u8; 32] = rand::rng().random();
    let plaintext: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    let hash = hash_refresh_token(&plaintext);
    (plaintext, hash)
}

/// SHA-256 hex digest of a refresh token, as stored in `user_sessions`.
pub fn hash_refresh_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
