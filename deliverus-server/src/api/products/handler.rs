//! Product API Handlers

use axum::Json;
use axum::extract::State;
use shared::error::AppResult;
use shared::models::{Product, ProductCreate, ProductUpdate};

use crate::api::extract::Payload;
use crate::auth::GuardContext;
use crate::services::product;
use crate::state::AppState;

/// GET /products/popular
pub async fn popular(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(product::popular(&state).await?))
}

/// GET /products/{id}
pub async fn show(ctx: GuardContext) -> AppResult<Json<Product>> {
    Ok(Json(ctx.product()?.clone()))
}

/// POST /products
pub async fn create(
    State(state): State<AppState>,
    ctx: GuardContext,
    Payload(data): Payload<ProductCreate>,
) -> AppResult<Json<Product>> {
    Ok(Json(product::create(&state, ctx.user()?, data).await?))
}

/// PUT /products/{id}
pub async fn update(
    State(state): State<AppState>,
    ctx: GuardContext,
    Payload(data): Payload<ProductUpdate>,
) -> AppResult<Json<Product>> {
    let current = ctx.product()?.clone();
    let updated = product::update(&state, current, data).await?;
    Ok(Json(updated))
}

/// DELETE /products/{id}
pub async fn destroy(
    State(state): State<AppState>,
    ctx: GuardContext,
) -> AppResult<Json<String>> {
    let current = ctx.product()?;
    product::delete(&state, current).await?;
    Ok(Json(format!("Successfully deleted product id.{}", current.id)))
}
