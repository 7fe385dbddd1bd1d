//! Pricing and visibility engine
//!
//! Pure functions over the shared models: derived product prices, the
//! percentage cascade, visibility windows and listing order.

pub mod calculator;
pub mod visibility;

pub use calculator::{
    MAX_PRICE, MAX_QUANTITY, PricingError, compute_price, order_total, reprice,
    validate_percentage,
};
pub use visibility::{
    is_visible, order_pinned_first, validate_visibility_availability, validate_visible_until,
    visible_products,
};
