//! Product service

use chrono::Utc;
use shared::error::{AppError, ErrorCode, FieldError};
use shared::models::{NewProduct, Product, ProductCreate, ProductUpdate, User};

use crate::error::ServiceResult;
use crate::pricing;
use crate::security_log;
use crate::state::AppState;
use crate::validation;

/// Create a product in one of the owner's restaurants
///
/// The body names the restaurant, so ownership is checked here after
/// validation rather than by the guard chain.
pub async fn create(state: &AppState, owner: &User, data: ProductCreate) -> ServiceResult<Product> {
    validation::validate_product_create(&data, Utc::now())?;

    let restaurant = state
        .restaurants
        .find_by_id(data.restaurant_id)
        .await?
        .ok_or_else(|| {
            AppError::invalid_fields(vec![FieldError::new(
                "restaurantId",
                "The restaurant does not exist",
            )])
        })?;
    if !restaurant.is_owned_by(owner.id) {
        security_log!(
            WARN,
            "not_owner",
            user_id = owner.id,
            restaurant_id = restaurant.id
        );
        return Err(AppError::new(ErrorCode::NotOwner).into());
    }

    let product = state
        .products
        .create(NewProduct {
            restaurant_id: restaurant.id,
            name: data.name.trim().to_string(),
            description: data.description,
            base_price: data.price,
            availability: data.availability.unwrap_or(true),
            visible_until: data.visible_until,
            order: data.order,
        })
        .await?;

    tracing::info!(
        product_id = product.id,
        restaurant_id = restaurant.id,
        "Product created"
    );
    Ok(product)
}

/// Apply `data` to `current`; the store derives the price from the new base
/// price and the restaurant's current percentage.
pub async fn update(
    state: &AppState,
    current: Product,
    data: ProductUpdate,
) -> ServiceResult<Product> {
    let mut product = current;
    data.apply_to(&mut product);
    validation::validate_product_update(&data, &product, Utc::now())?;

    Ok(state.products.update(&product).await?)
}

/// How many products `GET /products/popular` returns
pub const POPULAR_LIMIT: usize = 3;

/// The most ordered products that are visible right now
pub async fn popular(state: &AppState) -> ServiceResult<Vec<Product>> {
    let now = Utc::now();
    Ok(state
        .products
        .find_most_ordered()
        .await?
        .into_iter()
        .filter(|p| pricing::is_visible(p, now))
        .take(POPULAR_LIMIT)
        .collect())
}

pub async fn delete(state: &AppState, product: &Product) -> ServiceResult<()> {
    state.products.delete(product.id).await?;
    tracing::info!(product_id = product.id, "Product deleted");
    Ok(())
}
