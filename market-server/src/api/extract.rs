//! Request extractors

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use shared::{AppError, ErrorCode};
use validator::Validate;

/// `Json<T>` that also runs `validator` rules.
///
/// Malformed bodies and rule violations are both answered with
/// `ValidationFailed` (400) instead of axum's plain-text rejection.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                AppError::with_message(ErrorCode::ValidationFailed, rejection.body_text())
            })?;

        value.validate().map_err(|errors| {
            let mut fields: Vec<String> = errors
                .field_errors()
                .keys()
                .map(|k| k.to_string())
                .collect();
            fields.sort();
            AppError::with_message(ErrorCode::ValidationFailed, errors.to_string())
                .with_detail("fields", fields)
        })?;

        Ok(Self(value))
    }
}
