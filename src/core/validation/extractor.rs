//! Axum extractor for validated request bodies
//!
//! `ValidatedJson<T>` deserializes the body and runs `T::validate()` before the
//! handler sees it. Both failure paths become [`ApiError::ValidationFailure`]
//! so clients always get the uniform error envelope.

use crate::core::error::ApiError;
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Axum extractor that deserializes and validates a JSON body
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_company(
///     ValidatedJson(payload): ValidatedJson<CreateCompanyRequest>,
/// ) -> ApiResult<Json<CompanyResponse>> {
///     // payload passed every #[validate] rule
/// }
/// ```
///
/// Handlers that must check existence before reporting a bad body take
/// `Result<ValidatedJson<T>, ApiError>` instead.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state).await?;
        payload.validate()?;
        Ok(ValidatedJson(payload))
    }
}
