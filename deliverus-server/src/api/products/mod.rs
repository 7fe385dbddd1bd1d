//! Product API
//!
//! | Path | Method | Guard |
//! |------|--------|-------|
//! | /products | POST | owner (restaurant ownership checked after validation) |
//! | /products/popular | GET | - |
//! | /products/{id} | GET | exists |
//! | /products/{id} | PUT | owner, owns its restaurant |
//! | /products/{id} | DELETE | owner, owns its restaurant, never ordered |

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::{Check, OWNER, guard};
use crate::state::AppState;

const EXISTS: &[Check] = &[Check::ProductExists];

const CREATE: &[Check] = &[Check::Authenticated, Check::Role(OWNER)];

const OWNED: &[Check] = &[
    Check::Authenticated,
    Check::Role(OWNER),
    Check::ProductExists,
    Check::ProductOwned,
];

const DELETE: &[Check] = &[
    Check::Authenticated,
    Check::Role(OWNER),
    Check::ProductExists,
    Check::ProductOwned,
    Check::ProductNotOrdered,
];

pub fn router(state: &AppState) -> Router<AppState> {
    let public = Router::new().route("/products/popular", get(handler::popular));

    let read = Router::new()
        .route("/products/{id}", get(handler::show))
        .route_layer(middleware::from_fn(guard(state.clone(), EXISTS)));

    let create = Router::new()
        .route("/products", post(handler::create))
        .route_layer(middleware::from_fn(guard(state.clone(), CREATE)));

    let manage = Router::new()
        .route("/products/{id}", put(handler::update))
        .route_layer(middleware::from_fn(guard(state.clone(), OWNED)));

    let remove = Router::new()
        .route("/products/{id}", delete(handler::destroy))
        .route_layer(middleware::from_fn(guard(state.clone(), DELETE)));

    public.merge(read).merge(create).merge(manage).merge(remove)
}
