//! HTTP API
//!
//! - [`health`] - liveness probe
//! - [`users`] - registration, login, profiles
//! - [`restaurants`] - restaurants, their products and orders
//! - [`products`] - product management
//! - [`orders`] - order placement and status transitions

pub mod extract;
pub mod health;
pub mod orders;
pub mod products;
pub mod restaurants;
pub mod users;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(users::router(&state))
        .merge(restaurants::router(&state))
        .merge(products::router(&state))
        .merge(orders::router(&state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
