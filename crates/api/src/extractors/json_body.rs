//! JSON request body extractor with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// A JSON body that has been parsed and validated.
///
/// Bodies that are missing, not `application/json` or not parseable are
/// rejected with "Not a JSON". Well-formed JSON of the wrong shape and
/// failed validation rules are rejected as validation errors.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| match rejection {
                JsonRejection::JsonDataError(e) => ApiError::Validation(e.body_text()),
                _ => ApiError::not_a_json(),
            })?;

        value.validate()?;
        Ok(JsonBody(value))
    }
}
