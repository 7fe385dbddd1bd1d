//! Unified error system for the DeliverUS backend
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`FieldError`]: One failing request field, collected into validation errors
//! - [`ErrorResponse`]: Body of every failed response
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, FieldError};
//!
//! let err = AppError::new(ErrorCode::RestaurantNotFound);
//! assert_eq!(err.http_status().as_u16(), 404);
//!
//! let err = AppError::invalid_fields(vec![
//!     FieldError::new("percentage", "must be between -5 and 5"),
//! ]);
//! assert_eq!(err.http_status().as_u16(), 422);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorResponse, FIELD_ERRORS_KEY, FieldError};
