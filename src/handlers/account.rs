//! Account API handlers
//!
//! Each handler is a thin composition of store lookups, the token codec,
//! and response shaping.

use crate::auth::jwt::{issue_token_pair, TokenPair};
use crate::auth::middleware::{CurrentAccount, RefreshClaims};
use crate::auth::password::{hash_password, verify_password};
use crate::account::{Account, StoreError};
use crate::error::{AppError, FieldError};
use crate::state::AppState;
use crate::validate::ValidatedJson;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 64, message = "must be between 8 and 64 characters"))]
    pub password: String,
}

/// Registration request (admin-provisioned; the password is set later via
/// the activation link)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
}

/// Password recovery request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecoverPasswordRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
}

/// Activation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ActivateRequest {
    #[validate(length(min = 8, max = 64, message = "must be between 8 and 64 characters"))]
    pub password: String,
}

/// Response carrying a fresh token pair
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub message: String,
    pub success: bool,
    pub token: String,
    pub refresh_token: String,
}

impl TokenResponse {
    fn new(message: &str, pair: TokenPair) -> Self {
        Self {
            message: message.to_string(),
            success: true,
            token: format!("Bearer {}", pair.token),
            refresh_token: format!("Bearer {}", pair.refresh_token),
        }
    }
}

/// Registration response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub success: bool,
    pub active_url: String,
}

/// Plain success response
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
    pub success: bool,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            success: true,
        }
    }
}

/// Account detail response
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountResponse {
    pub message: String,
    pub success: bool,
    pub account: Account,
}

/// Login with email and password
///
/// Unknown email, pending (never activated) account, and password mismatch
/// are indistinguishable: all yield 401 "Unauthorized".
#[utoipa::path(
    post,
    path = "/api/account/login",
    tag = "account",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 400, description = "Validation error", body = crate::error::ErrorBody),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody),
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let account = match state.store.find_by_email(&request.email).await {
        Ok(account) => account,
        Err(StoreError::NotFound) => return Err(AppError::Unauthorized),
        Err(e) => return Err(e.into()),
    };

    let Some(hash) = account.password_hash.as_deref() else {
        // Pending account, nothing to match against
        return Err(AppError::Unauthorized);
    };

    if !verify_password(&request.password, hash)? {
        return Err(AppError::Unauthorized);
    }

    let pair = issue_token_pair(&state.config.jwt, account.id)?;

    Ok(Json(TokenResponse::new("Logged in", pair)))
}

/// Create a new account (admin only)
///
/// The account starts pending: no usable password, a one-time activation
/// token, and the customer role. The response carries the activation URL.
#[utoipa::path(
    post,
    path = "/api/account/register",
    tag = "account",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Created new account", body = RegisterResponse),
        (status = 400, description = "Email already registered", body = crate::error::ErrorBody),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    match state.store.find_by_email(&request.email).await {
        Ok(_) => {
            return Err(AppError::BadRequest(
                "An account with the given email address already exists".to_string(),
            ))
        }
        Err(StoreError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }

    let active_token = Uuid::new_v4();
    let account = Account::new_pending(request.email, active_token);

    // A concurrent registration can still win the race; the unique
    // constraint maps it to the same 400 as the pre-check.
    state.store.create(&account).await?;

    let active_url = format!("{}/account/active/{active_token}", state.config.client_url);
    // TODO: send the activation url by email

    let response = RegisterResponse {
        message: "Created new account".to_string(),
        success: true,
        active_url,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Request a password recovery link
///
/// Always answers 200, whether or not the email exists, so the endpoint
/// cannot be used to enumerate accounts.
#[utoipa::path(
    post,
    path = "/api/account/recover-password",
    tag = "account",
    request_body = RecoverPasswordRequest,
    responses(
        (status = 200, description = "Password change link has been sent", body = MessageResponse),
        (status = 400, description = "Validation error", body = crate::error::ErrorBody),
    )
)]
pub async fn recover_password(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RecoverPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    match state.store.find_by_email(&request.email).await {
        Ok(mut account) => {
            account.active_token = Some(Uuid::new_v4());
            state.store.save(&account).await?;
            // TODO: send the recovery url by email
        }
        Err(StoreError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }

    Ok(Json(MessageResponse::new(
        "Password change link has been sent",
    )))
}

/// Activate an account (or complete a password reset)
///
/// Redeems the one-time token from the path, sets the supplied password,
/// and returns a token pair. An unknown token is a 404 and mutates nothing.
#[utoipa::path(
    put,
    path = "/api/account/active/{active_token}",
    tag = "account",
    request_body = ActivateRequest,
    params(("active_token" = Uuid, Path, description = "One-time activation token")),
    responses(
        (status = 200, description = "Account has been activated", body = TokenResponse),
        (status = 400, description = "Validation error", body = crate::error::ErrorBody),
        (status = 404, description = "Account not found", body = crate::error::ErrorBody),
    )
)]
pub async fn active(
    State(state): State<Arc<AppState>>,
    Path(active_token): Path<String>,
    ValidatedJson(request): ValidatedJson<ActivateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let active_token = Uuid::parse_str(&active_token).map_err(|_| {
        AppError::Validation(vec![FieldError::new("activeToken", "must be a valid UUID")])
    })?;

    let mut account = match state.store.find_by_active_token(active_token).await {
        Ok(account) => account,
        Err(StoreError::NotFound) => {
            return Err(AppError::NotFound("Account not found".to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    account.password_hash = Some(hash_password(&request.password)?);
    account.active_token = None;
    state.store.save(&account).await?;

    let pair = issue_token_pair(&state.config.jwt, account.id)?;

    Ok(Json(TokenResponse::new("Account has been activated", pair)))
}

/// Deactivate the caller's pending password recovery link
#[utoipa::path(
    put,
    path = "/api/account/deactivate-password-recovery-link",
    tag = "account",
    responses(
        (status = 200, description = "Recovery link has been deactivated", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn deactivate_password_recovery_link(
    State(state): State<Arc<AppState>>,
    Extension(CurrentAccount(mut account)): Extension<CurrentAccount>,
) -> Result<impl IntoResponse, AppError> {
    account.active_token = None;
    state.store.save(&account).await?;

    Ok(Json(MessageResponse::new(
        "Recovery link has been deactivated",
    )))
}

/// Exchange a refresh token for a new token pair
///
/// The payload id is trusted as-is; the store is not consulted and the
/// previous access token stays valid until its own expiry.
#[utoipa::path(
    get,
    path = "/api/account/refresh-token",
    tag = "account",
    responses(
        (status = 200, description = "New tokens have been generated", body = TokenResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<RefreshClaims>,
) -> Result<impl IntoResponse, AppError> {
    let pair = issue_token_pair(&state.config.jwt, claims.account_id)?;

    Ok(Json(TokenResponse::new(
        "New tokens have been generated",
        pair,
    )))
}

/// Return the caller's account details
///
/// The password hash is excluded at the serialization level.
#[utoipa::path(
    get,
    path = "/api/account/me",
    tag = "account",
    responses(
        (status = 200, description = "Account details", body = AccountResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(AccountResponse {
        message: "Account details".to_string(),
        success: true,
        account,
    }))
}

/// Delete the caller's own account
#[utoipa::path(
    delete,
    path = "/api/account/delete",
    tag = "account",
    responses(
        (status = 200, description = "Account has been destroyed", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorBody),
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Extension(CurrentAccount(account)): Extension<CurrentAccount>,
) -> Result<impl IntoResponse, AppError> {
    state.store.delete(account.id).await?;

    Ok(Json(MessageResponse::new("Account has been destroyed")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::JwtConfig;

    #[test]
    fn test_token_response_carries_bearer_prefix() {
        let pair = issue_token_pair(&JwtConfig::default(), Uuid::new_v4()).unwrap();
        let response = TokenResponse::new("Logged in", pair);

        assert!(response.token.starts_with("Bearer "));
        assert!(response.refresh_token.starts_with("Bearer "));
        assert!(response.success);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"refreshToken\""));
    }

    #[test]
    fn test_account_response_excludes_password() {
        let mut account = Account::new_pending("test@test.com".to_string(), Uuid::new_v4());
        account.password_hash = Some("$argon2id$v=19$hash".to_string());

        let response = AccountResponse {
            message: "Account details".to_string(),
            success: true,
            account,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("test@test.com"));
    }
}
