use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Drop-in replacement for `axum::Json` on request bodies.
///
/// Axum's default rejection is a plain-text response; a malformed body
/// here instead becomes a 400 `VALIDATION_ERROR` `ErrorBody`, so a client
/// sending broken JSON gets the same error shape as one failing domain
/// validation. This also catches closed-enum misses, e.g. an unsupported
/// `lang` value.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(AppError::Validation(rejection.body_text())),
        }
    }
}
