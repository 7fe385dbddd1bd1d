//! Order API Handlers

use axum::Json;
use axum::extract::State;
use shared::error::AppResult;
use shared::models::{Order, OrderCreate};

use crate::api::extract::Payload;
use crate::auth::GuardContext;
use crate::services::order;
use crate::state::AppState;

/// GET /orders - the customer's orders, newest first
pub async fn list(State(state): State<AppState>, ctx: GuardContext) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(order::list_for_customer(&state, ctx.user()?).await?))
}

/// POST /orders
pub async fn create(
    State(state): State<AppState>,
    ctx: GuardContext,
    Payload(data): Payload<OrderCreate>,
) -> AppResult<Json<Order>> {
    Ok(Json(order::create(&state, ctx.user()?, data).await?))
}

/// GET /orders/{id}
pub async fn show(ctx: GuardContext) -> AppResult<Json<Order>> {
    Ok(Json(ctx.order()?.clone()))
}

/// PATCH /orders/{id}/confirm | send | deliver
///
/// The route's guard chain pins the expected current status.
pub async fn advance(
    State(state): State<AppState>,
    ctx: GuardContext,
) -> AppResult<Json<Order>> {
    Ok(Json(order::advance(&state, ctx.order()?).await?))
}
