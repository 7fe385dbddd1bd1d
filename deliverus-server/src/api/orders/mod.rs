//! Order API
//!
//! | Path | Method | Guard |
//! |------|--------|-------|
//! | /orders | GET | customer |
//! | /orders | POST | customer |
//! | /orders/{id} | GET | placed it or owns its restaurant |
//! | /orders/{id}/confirm | PATCH | owner, owns its restaurant, pending |
//! | /orders/{id}/send | PATCH | owner, owns its restaurant, confirmed |
//! | /orders/{id}/deliver | PATCH | owner, owns its restaurant, sent |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch},
};
use shared::models::OrderStatus;

use crate::auth::{CUSTOMER, Check, OWNER, guard};
use crate::state::AppState;

const CUSTOMER_ONLY: &[Check] = &[Check::Authenticated, Check::Role(CUSTOMER)];

const SHOW: &[Check] = &[Check::Authenticated, Check::OrderExists, Check::OrderVisible];

const fn transition(from: OrderStatus) -> [Check; 5] {
    [
        Check::Authenticated,
        Check::Role(OWNER),
        Check::OrderExists,
        Check::OrderOwned,
        Check::OrderStatusIs(from),
    ]
}

const CONFIRM: &[Check] = &transition(OrderStatus::Pending);
const SEND: &[Check] = &transition(OrderStatus::Confirmed);
const DELIVER: &[Check] = &transition(OrderStatus::Sent);

pub fn router(state: &AppState) -> Router<AppState> {
    let customer = Router::new()
        .route("/orders", get(handler::list).post(handler::create))
        .route_layer(middleware::from_fn(guard(state.clone(), CUSTOMER_ONLY)));

    let show = Router::new()
        .route("/orders/{id}", get(handler::show))
        .route_layer(middleware::from_fn(guard(state.clone(), SHOW)));

    let confirm = Router::new()
        .route("/orders/{id}/confirm", patch(handler::advance))
        .route_layer(middleware::from_fn(guard(state.clone(), CONFIRM)));
    let send = Router::new()
        .route("/orders/{id}/send", patch(handler::advance))
        .route_layer(middleware::from_fn(guard(state.clone(), SEND)));
    let deliver = Router::new()
        .route("/orders/{id}/deliver", patch(handler::advance))
        .route_layer(middleware::from_fn(guard(state.clone(), DELIVER)));

    customer.merge(show).merge(confirm).merge(send).merge(deliver)
}
