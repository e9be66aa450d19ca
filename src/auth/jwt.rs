//! JWT token issuance and verification
//!
//! Access and refresh tokens share a single HMAC-SHA256 signing secret and
//! payload shape; they differ only in the `isRefreshToken` flag and their
//! expiration (1 hour vs. 30 days by default).

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// JWT claims embedded in both token kinds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Token issuer (always "account-api")
    pub iss: String,
    /// Subject - account ID
    pub sub: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: u64,
    /// Expiration timestamp (Unix epoch)
    pub exp: u64,
    /// Distinguishes refresh tokens from access tokens
    #[serde(rename = "isRefreshToken")]
    pub is_refresh_token: bool,
}

/// Token generation and validation errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode JWT: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid token format")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("System time error: {0}")]
    SystemTimeError(#[from] std::time::SystemTimeError),
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HMAC signing
    pub secret: String,
    /// Access token expiration time in seconds (default: 3600 = 1 hour)
    pub access_expiration_secs: u64,
    /// Refresh token expiration time in seconds (default: 2592000 = 30 days)
    pub refresh_expiration_secs: u64,
    /// Token issuer identifier
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "development-secret-key-change-in-production".to_string(),
            access_expiration_secs: 3600,
            refresh_expiration_secs: 30 * 24 * 3600,
            issuer: "account-api".to_string(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "development-secret-key-change-in-production".to_string()),
            access_expiration_secs: std::env::var("JWT_ACCESS_EXPIRATION_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            refresh_expiration_secs: std::env::var("JWT_REFRESH_EXPIRATION_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30 * 24 * 3600),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "account-api".to_string()),
        }
    }
}

/// A freshly signed access/refresh token pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

/// Issue an access/refresh token pair for an account
///
/// Both tokens carry the same account id; they differ only in the refresh
/// flag and expiration.
pub fn issue_token_pair(config: &JwtConfig, account_id: Uuid) -> Result<TokenPair, JwtError> {
    Ok(TokenPair {
        token: sign(config, account_id, false, config.access_expiration_secs)?,
        refresh_token: sign(config, account_id, true, config.refresh_expiration_secs)?,
    })
}

fn sign(
    config: &JwtConfig,
    account_id: Uuid,
    is_refresh_token: bool,
    expires_in_secs: u64,
) -> Result<String, JwtError> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

    let claims = Claims {
        iss: config.issuer.clone(),
        sub: account_id.to_string(),
        iat: now,
        exp: now + expires_in_secs,
        is_refresh_token,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Validate a token and extract its claims
///
/// Fails with `ExpiredToken`, `InvalidSignature`, or `InvalidToken`;
/// callers at the HTTP boundary collapse all three into a single 401.
pub fn verify_token(config: &JwtConfig, token: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        _ => JwtError::InvalidToken,
    })?;

    Ok(token_data.claims)
}
