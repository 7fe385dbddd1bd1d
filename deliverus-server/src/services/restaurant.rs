//! Restaurant service

use chrono::Utc;
use shared::models::{
    NewRestaurant, Order, Restaurant, RestaurantCreate, RestaurantDetail, RestaurantUpdate,
    User,
};

use crate::error::ServiceResult;
use crate::pricing;
use crate::state::AppState;
use crate::validation;

pub async fn list(state: &AppState) -> ServiceResult<Vec<Restaurant>> {
    Ok(state.restaurants.find_all().await?)
}

/// Restaurant with its currently visible products
pub async fn detail(state: &AppState, restaurant: Restaurant) -> ServiceResult<RestaurantDetail> {
    let products = visible_products(state, restaurant.id).await?;
    Ok(RestaurantDetail {
        restaurant,
        products,
    })
}

pub async fn visible_products(
    state: &AppState,
    restaurant_id: i64,
) -> ServiceResult<Vec<shared::models::Product>> {
    let products = state.products.find_by_restaurant(restaurant_id).await?;
    Ok(pricing::visible_products(products, Utc::now()))
}

/// Restaurants of the owner, pinned ones first
pub async fn owned_by(state: &AppState, owner: &User) -> ServiceResult<Vec<Restaurant>> {
    let restaurants = state.restaurants.find_by_owner(owner.id).await?;
    Ok(pricing::order_pinned_first(restaurants))
}

pub async fn orders(state: &AppState, restaurant: &Restaurant) -> ServiceResult<Vec<Order>> {
    Ok(state.orders.find_by_restaurant(restaurant.id).await?)
}

pub async fn create(
    state: &AppState,
    owner: &User,
    data: RestaurantCreate,
) -> ServiceResult<Restaurant> {
    validation::validate_restaurant_create(&data)?;

    let restaurant = state
        .restaurants
        .create(NewRestaurant {
            name: data.name.trim().to_string(),
            description: data.description,
            address: data.address,
            postal_code: data.postal_code,
            url: data.url,
            shipping_costs: data.shipping_costs,
            email: data.email,
            phone: data.phone,
            status: data.status.unwrap_or_default(),
            percentage: data.percentage.unwrap_or_default(),
            pinned_at: data.pinned.then(Utc::now),
            user_id: owner.id,
        })
        .await?;

    tracing::info!(
        restaurant_id = restaurant.id,
        owner_id = owner.id,
        pinned = restaurant.is_pinned(),
        "Restaurant created"
    );
    Ok(restaurant)
}

/// Apply `data` to `current`; the store reprices every product from the
/// stored percentage in the same transaction.
pub async fn update(
    state: &AppState,
    current: Restaurant,
    data: RestaurantUpdate,
) -> ServiceResult<Restaurant> {
    validation::validate_restaurant_update(&data)?;

    let mut restaurant = current.clone();
    data.apply_to(&mut restaurant);

    let updated = state.restaurants.update(&restaurant).await?;

    if updated.percentage != current.percentage {
        tracing::info!(
            restaurant_id = updated.id,
            from = %current.percentage,
            to = %updated.percentage,
            "Restaurant percentage changed, products repriced"
        );
    }
    Ok(updated)
}

/// Flip `pinnedAt` between null and now
pub async fn toggle_pinned(state: &AppState, restaurant: &Restaurant) -> ServiceResult<Restaurant> {
    let pinned_at = match restaurant.pinned_at {
        Some(_) => None,
        None => Some(Utc::now()),
    };
    Ok(state
        .restaurants
        .set_pinned_at(restaurant.id, pinned_at)
        .await?)
}

pub async fn delete(state: &AppState, restaurant: &Restaurant) -> ServiceResult<()> {
    state.restaurants.delete(restaurant.id).await?;
    tracing::info!(restaurant_id = restaurant.id, "Restaurant deleted");
    Ok(())
}
