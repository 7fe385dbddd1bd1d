//! Shared types for DeliverUS
//!
//! Domain models and the unified error system used by the server
//! and its HTTP clients.

pub mod error;
pub mod models;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode, ErrorResponse, FieldError};
pub use http;
pub use serde::{Deserialize, Serialize};
