//! Restaurant API
//!
//! | Path | Method | Guard |
//! |------|--------|-------|
//! | /restaurants | GET | - |
//! | /restaurants | POST | owner |
//! | /restaurants/{id} | GET | exists |
//! | /restaurants/{id} | PUT | owner, owns it |
//! | /restaurants/{id} | DELETE | owner, owns it, no orders |
//! | /restaurants/{id}/togglePinned | PATCH | owner, owns it |
//! | /restaurants/{id}/products | GET | exists |
//! | /restaurants/{id}/orders | GET | owner, owns it |

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post, put},
};

use crate::auth::{Check, OWNER, guard};
use crate::state::AppState;

const EXISTS: &[Check] = &[Check::RestaurantExists];

const CREATE: &[Check] = &[Check::Authenticated, Check::Role(OWNER)];

const OWNED: &[Check] = &[
    Check::Authenticated,
    Check::Role(OWNER),
    Check::RestaurantExists,
    Check::RestaurantOwned,
];

const DELETE: &[Check] = &[
    Check::Authenticated,
    Check::Role(OWNER),
    Check::RestaurantExists,
    Check::RestaurantOwned,
    Check::RestaurantHasNoOrders,
];

pub fn router(state: &AppState) -> Router<AppState> {
    let public = Router::new().route("/restaurants", get(handler::list));

    let read = Router::new()
        .route("/restaurants/{id}", get(handler::show))
        .route("/restaurants/{id}/products", get(handler::products))
        .route_layer(middleware::from_fn(guard(state.clone(), EXISTS)));

    let create = Router::new()
        .route("/restaurants", post(handler::create))
        .route_layer(middleware::from_fn(guard(state.clone(), CREATE)));

    let manage = Router::new()
        .route("/restaurants/{id}", put(handler::update))
        .route("/restaurants/{id}/togglePinned", patch(handler::toggle_pinned))
        .route("/restaurants/{id}/orders", get(handler::orders))
        .route_layer(middleware::from_fn(guard(state.clone(), OWNED)));

    let remove = Router::new()
        .route("/restaurants/{id}", delete(handler::destroy))
        .route_layer(middleware::from_fn(guard(state.clone(), DELETE)));

    public.merge(read).merge(create).merge(manage).merge(remove)
}
