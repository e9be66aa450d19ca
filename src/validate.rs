//! Request validation
//!
//! `ValidatedJson` deserializes the body and runs the `validator` derive
//! rules before the handler executes, short-circuiting with a 400 and a
//! structured list of field errors.

use crate::error::AppError;
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor that rejects invalid payloads with the validation envelope
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        value.validate()?;

        Ok(Self(value))
    }
}
