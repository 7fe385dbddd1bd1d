//! Restaurant API Handlers

use axum::Json;
use axum::extract::State;
use shared::error::AppResult;
use shared::models::{Order, Product, Restaurant, RestaurantCreate, RestaurantDetail, RestaurantUpdate};

use crate::api::extract::Payload;
use crate::auth::GuardContext;
use crate::services::restaurant;
use crate::state::AppState;

/// GET /restaurants
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Restaurant>>> {
    Ok(Json(restaurant::list(&state).await?))
}

/// GET /restaurants/{id} - with its visible products
pub async fn show(
    State(state): State<AppState>,
    ctx: GuardContext,
) -> AppResult<Json<RestaurantDetail>> {
    let current = ctx.restaurant()?.clone();
    Ok(Json(restaurant::detail(&state, current).await?))
}

/// GET /restaurants/{id}/products
pub async fn products(
    State(state): State<AppState>,
    ctx: GuardContext,
) -> AppResult<Json<Vec<Product>>> {
    let id = ctx.restaurant()?.id;
    Ok(Json(restaurant::visible_products(&state, id).await?))
}

/// GET /restaurants/{id}/orders
pub async fn orders(
    State(state): State<AppState>,
    ctx: GuardContext,
) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(restaurant::orders(&state, ctx.restaurant()?).await?))
}

/// POST /restaurants
pub async fn create(
    State(state): State<AppState>,
    ctx: GuardContext,
    Payload(data): Payload<RestaurantCreate>,
) -> AppResult<Json<Restaurant>> {
    Ok(Json(restaurant::create(&state, ctx.user()?, data).await?))
}

/// PUT /restaurants/{id}
pub async fn update(
    State(state): State<AppState>,
    ctx: GuardContext,
    Payload(data): Payload<RestaurantUpdate>,
) -> AppResult<Json<Restaurant>> {
    let current = ctx.restaurant()?.clone();
    Ok(Json(restaurant::update(&state, current, data).await?))
}

/// PATCH /restaurants/{id}/togglePinned
pub async fn toggle_pinned(
    State(state): State<AppState>,
    ctx: GuardContext,
) -> AppResult<Json<Restaurant>> {
    Ok(Json(restaurant::toggle_pinned(&state, ctx.restaurant()?).await?))
}

/// DELETE /restaurants/{id}
pub async fn destroy(
    State(state): State<AppState>,
    ctx: GuardContext,
) -> AppResult<Json<String>> {
    let current = ctx.restaurant()?;
    restaurant::delete(&state, current).await?;
    Ok(Json(format!("Successfully deleted restaurant id.{}", current.id)))
}
