//! User API
//!
//! | Path | Method | Guard |
//! |------|--------|-------|
//! | /users | PUT | authenticated |
//! | /users | DELETE | authenticated |
//! | /users/register | POST | - |
//! | /users/registerOwner | POST | - |
//! | /users/login | POST | - |
//! | /users/loginOwner | POST | - |
//! | /users/isTokenValid | PUT | - (token in the body) |
//! | /users/myRestaurants | GET | owner |
//! | /users/{id} | GET | authenticated |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::{Check, OWNER, guard};
use crate::state::AppState;

const AUTHENTICATED: &[Check] = &[Check::Authenticated];

const OWNER_ONLY: &[Check] = &[Check::Authenticated, Check::Role(OWNER)];

pub fn router(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/users/register", post(handler::register_customer))
        .route("/users/registerOwner", post(handler::register_owner))
        .route("/users/login", post(handler::login_customer))
        .route("/users/loginOwner", post(handler::login_owner))
        .route("/users/isTokenValid", put(handler::token_valid));

    let account = Router::new()
        .route("/users", put(handler::update).delete(handler::destroy))
        .route("/users/{id}", get(handler::profile))
        .route_layer(middleware::from_fn(guard(state.clone(), AUTHENTICATED)));

    let owner = Router::new()
        .route("/users/myRestaurants", get(handler::my_restaurants))
        .route_layer(middleware::from_fn(guard(state.clone(), OWNER_ONLY)));

    public.merge(account).merge(owner)
}
