//! Order service

use std::collections::HashMap;

use chrono::Utc;
use shared::error::{AppError, ErrorCode};
use shared::models::{NewOrder, Order, OrderCreate, OrderLine, User};

use crate::error::ServiceResult;
use crate::pricing;
use crate::state::AppState;
use crate::validation::{self, Validator};

pub async fn list_for_customer(state: &AppState, customer: &User) -> ServiceResult<Vec<Order>> {
    Ok(state.orders.find_by_customer(customer.id).await?)
}

/// Place an order
///
/// Every product must belong to the restaurant and be visible now. Unit
/// prices are copied from the products' current prices and never change
/// afterwards.
pub async fn create(state: &AppState, customer: &User, data: OrderCreate) -> ServiceResult<Order> {
    let mut v = Validator::new();
    validation::validate_order_shape(&data, &mut v);

    let restaurant = state.restaurants.find_by_id(data.restaurant_id).await?;
    if restaurant.is_none() {
        v.reject("restaurantId", "The restaurant does not exist");
    }

    let catalog: HashMap<i64, _> = match &restaurant {
        Some(r) => state
            .products
            .find_by_restaurant(r.id)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect(),
        None => HashMap::new(),
    };

    let now = Utc::now();
    let mut lines = Vec::with_capacity(data.products.len());
    if restaurant.is_some() {
        for line in &data.products {
            match catalog.get(&line.product_id) {
                Some(product) if pricing::is_visible(product, now) => lines.push(OrderLine {
                    product_id: product.id,
                    quantity: line.quantity,
                    unit_price: product.price,
                }),
                Some(_) => {
                    v.reject(
                        "products",
                        format!("Product {} is not available", line.product_id),
                    );
                }
                None => {
                    v.reject(
                        "products",
                        format!(
                            "Product {} does not belong to the restaurant",
                            line.product_id
                        ),
                    );
                }
            }
        }
    }
    v.finish()?;

    let Some(restaurant) = restaurant else {
        return Err(AppError::new(ErrorCode::RestaurantNotFound).into());
    };

    let order = state
        .orders
        .create(NewOrder {
            restaurant_id: restaurant.id,
            user_id: customer.id,
            address: data.address.trim().to_string(),
            shipping_costs: restaurant.shipping_costs,
            price: pricing::order_total(&lines, restaurant.shipping_costs)?,
            lines,
        })
        .await?;

    tracing::info!(
        order_id = order.id,
        restaurant_id = order.restaurant_id,
        customer_id = customer.id,
        total = %order.price,
        "Order placed"
    );
    Ok(order)
}

/// Move the order one step along `pending → confirmed → sent → delivered`
///
/// The guard chain has already checked the current status.
pub async fn advance(state: &AppState, order: &Order) -> ServiceResult<Order> {
    let next = order
        .status
        .next()
        .ok_or_else(|| AppError::conflict("The order has already been delivered"))?;
    let updated = state.orders.update_status(order.id, next, Utc::now()).await?;

    tracing::info!(
        order_id = updated.id,
        from = order.status.as_str(),
        to = updated.status.as_str(),
        "Order status changed"
    );
    Ok(updated)
}

