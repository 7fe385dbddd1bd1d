//! Data models
//!
//! Shared between deliverus-server and its clients (via API).
//! Wire format is camelCase JSON; money and percentages are `Decimal`
//! serialized as JSON numbers. All IDs are `i64` (BIGSERIAL).

pub mod order;
pub mod product;
pub mod restaurant;
pub mod user;

// Re-exports
pub use order::*;
pub use product::*;
pub use restaurant::*;
pub use user::*;

use serde::{Deserialize, Deserializer};

/// Deserialize a field that distinguishes "absent" from "explicit null".
///
/// Use with `#[serde(default, deserialize_with = "nullable")]` on an
/// `Option<Option<T>>`: absent -> `None`, `null` -> `Some(None)`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Unknown textual enum value read from storage
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
