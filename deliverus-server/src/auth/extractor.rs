//! Guard context extractor

use axum::extract::FromRequestParts;
use http::request::Parts;
use shared::error::AppError;

use crate::auth::guard::GuardContext;

impl<S> FromRequestParts<S> for GuardContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<GuardContext>()
            .cloned()
            .ok_or_else(|| AppError::internal("Route is missing its guard chain"))
    }
}
