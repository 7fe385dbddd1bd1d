//! User API Handlers

use axum::Json;
use axum::extract::{Path, State};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    AuthResponse, LoginRequest, Restaurant, TokenCheck, User, UserProfile, UserRegister, UserType,
    UserUpdate,
};

use crate::api::extract::Payload;
use crate::auth::GuardContext;
use crate::services::{restaurant, user};
use crate::state::AppState;

/// POST /users/register
pub async fn register_customer(
    State(state): State<AppState>,
    Payload(data): Payload<UserRegister>,
) -> AppResult<Json<AuthResponse>> {
    Ok(Json(user::register(&state, data, UserType::Customer).await?))
}

/// POST /users/registerOwner
pub async fn register_owner(
    State(state): State<AppState>,
    Payload(data): Payload<UserRegister>,
) -> AppResult<Json<AuthResponse>> {
    Ok(Json(user::register(&state, data, UserType::Owner).await?))
}

/// POST /users/login
pub async fn login_customer(
    State(state): State<AppState>,
    Payload(data): Payload<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    Ok(Json(user::login(&state, data, UserType::Customer).await?))
}

/// POST /users/loginOwner
pub async fn login_owner(
    State(state): State<AppState>,
    Payload(data): Payload<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    Ok(Json(user::login(&state, data, UserType::Owner).await?))
}

/// PUT /users/isTokenValid - the account behind a stored token
pub async fn token_valid(
    State(state): State<AppState>,
    Payload(data): Payload<TokenCheck>,
) -> AppResult<Json<User>> {
    Ok(Json(user::token_owner(&state, &data.token).await?))
}

/// PUT /users - edit the logged-in user's profile
pub async fn update(
    State(state): State<AppState>,
    ctx: GuardContext,
    Payload(data): Payload<UserUpdate>,
) -> AppResult<Json<User>> {
    Ok(Json(user::update(&state, ctx.user()?, data).await?))
}

/// DELETE /users - delete the logged-in user's account
pub async fn destroy(State(state): State<AppState>, ctx: GuardContext) -> AppResult<Json<String>> {
    let current = ctx.user()?;
    user::delete(&state, current).await?;
    Ok(Json(format!("Successfully deleted user id.{}", current.id)))
}

/// GET /users/{id} - public fields of any profile, for logged-in users
pub async fn profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserProfile>> {
    let id: i64 = id
        .parse()
        .map_err(|_| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(user::profile(&state, id).await?))
}

/// GET /users/myRestaurants - pinned restaurants first
pub async fn my_restaurants(
    State(state): State<AppState>,
    ctx: GuardContext,
) -> AppResult<Json<Vec<Restaurant>>> {
    Ok(Json(restaurant::owned_by(&state, ctx.user()?).await?))
}
