//! API error handling
//!
//! Every error response uses the `{message, success: false}` envelope.
//! Validation failures additionally carry a field-level error list.
//! Internal errors are logged and returned as a constant message; the
//! underlying cause is never echoed to the client.

use crate::account::StoreError;
use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// A single field validation error
#[derive(Debug, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error response envelope
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    Validation(Vec<FieldError>),
    BadRequest(String),
    Unauthorized,
    NotFound(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Validation error".to_string(),
                Some(errors),
            ),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None),
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string(), None)
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
            AppError::Internal(cause) => {
                tracing::error!("internal error: {cause}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_string(),
                    None,
                )
            }
        };

        let body = ErrorBody {
            message,
            success: false,
            errors,
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => AppError::NotFound("Account not found".to_string()),
            StoreError::EmailTaken => AppError::BadRequest(
                "An account with the given email address already exists".to_string(),
            ),
            StoreError::Database(cause) => AppError::Internal(cause),
        }
    }
}

impl From<JwtError> for AppError {
    fn from(e: JwtError) -> Self {
        AppError::Internal(format!("token error: {e}"))
    }
}

impl From<PasswordError> for AppError {
    fn from(e: PasswordError) -> Self {
        AppError::Internal(format!("password error: {e}"))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();

        AppError::Validation(fields)
    }
}
