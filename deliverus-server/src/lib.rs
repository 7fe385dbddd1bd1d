//! deliverus-server: food-delivery marketplace backend
//!
//! Restaurants, products, users and orders over a JSON HTTP API. Mutating
//! routes are gated by an ordered authorization guard chain ([`auth::guard`]);
//! product prices and listings come from the pricing engine ([`pricing`]).

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod pricing;
pub mod services;
pub mod state;
pub mod validation;

pub use api::create_router;
pub use config::Config;
pub use state::AppState;
