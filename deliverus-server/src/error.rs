//! Unified service-layer error type
//!
//! `ServiceError` bridges store errors (`RepoError`, `sqlx::Error`) and the
//! API-layer error (`AppError`), so services can use `?` on both.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::db::RepoError;
use crate::pricing::PricingError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service-layer error
///
/// - `Db`: store/infrastructure errors (logged, mapped to InternalError)
/// - `App`: business-rule errors (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    /// Database or infrastructure error
    Db(BoxError),
    /// Business-rule error (already an AppError with the correct ErrorCode)
    App(AppError),
}

impl From<RepoError> for ServiceError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(what) => ServiceError::App(AppError::not_found(what)),
            RepoError::Duplicate(what) => {
                ServiceError::App(AppError::with_message(ErrorCode::AlreadyExists, what))
            }
            // a reference appeared after the guard chain checked for it
            RepoError::Conflict(what) => ServiceError::App(AppError::conflict(what)),
            RepoError::OutOfRange(what) => {
                ServiceError::App(AppError::with_message(ErrorCode::ValidationFailed, what))
            }
            RepoError::Database(_) => ServiceError::Db(e.into()),
        }
    }
}

impl From<PricingError> for ServiceError {
    fn from(e: PricingError) -> Self {
        ServiceError::App(AppError::with_message(ErrorCode::ValidationFailed, e.to_string()))
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_errors_map_to_codes() {
        let app: AppError = ServiceError::from(RepoError::NotFound("order 9".into())).into();
        assert_eq!(app.code, ErrorCode::NotFound);

        let app: AppError = ServiceError::from(RepoError::Duplicate("email".into())).into();
        assert_eq!(app.code, ErrorCode::AlreadyExists);

        let app: AppError = ServiceError::from(RepoError::Conflict("fk".into())).into();
        assert_eq!(app.code, ErrorCode::Conflict);
        assert_eq!(app.http_status(), http::StatusCode::CONFLICT);

        let app: AppError = ServiceError::from(RepoError::OutOfRange("price".into())).into();
        assert_eq!(app.http_status(), http::StatusCode::UNPROCESSABLE_ENTITY);

        let app: AppError = ServiceError::from(RepoError::Database("boom".into())).into();
        assert_eq!(app.code, ErrorCode::InternalError);
        assert_eq!(app.message, "Internal server error");
    }

    #[test]
    fn test_pricing_overflow_is_unprocessable() {
        let app: AppError = ServiceError::from(PricingError::Overflow).into();
        assert_eq!(app.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_app_error_passes_through() {
        let app: AppError = ServiceError::from(AppError::new(ErrorCode::NotOwner)).into();
        assert_eq!(app.code, ErrorCode::NotOwner);
    }
}
