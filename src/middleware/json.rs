use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// `Json` body extractor whose rejections use the API error envelope.
///
/// Malformed or wrongly typed bodies become `400 VALIDATION_ERROR` instead
/// of axum's plain-text 415/422.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(rejection_to_api_error(rejection)),
        }
    }
}

fn rejection_to_api_error(rejection: JsonRejection) -> ApiError {
    tracing::warn!("Rejected request body ({}): {}", rejection.status(), rejection.body_text());
    ApiError::validation_error(format!("Invalid request body: {}", rejection.body_text()))
}
