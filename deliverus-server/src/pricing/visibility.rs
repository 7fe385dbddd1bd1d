//! Product visibility and listing order

use chrono::{DateTime, Utc};
use shared::FieldError;
use shared::models::{Product, Restaurant};

/// A product is listed while it is available and its visibility window is open.
pub fn is_visible(product: &Product, now: DateTime<Utc>) -> bool {
    product.availability && product.visible_until.is_none_or(|until| until >= now)
}

/// An unavailable product cannot carry a visibility limit at the same time.
pub fn validate_visibility_availability(
    availability: bool,
    visible_until: Option<DateTime<Utc>>,
) -> Result<(), FieldError> {
    if !availability && visible_until.is_some() {
        return Err(FieldError::new(
            "availability",
            "Cannot set the availability and visibility at the same time.",
        ));
    }
    Ok(())
}

/// A visibility limit must end in the future when it is set.
pub fn validate_visible_until(
    visible_until: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), FieldError> {
    match visible_until {
        Some(until) if until <= now => Err(FieldError::new(
            "visibleUntil",
            "The visibility must finish after the current date.",
        )),
        _ => Ok(()),
    }
}

/// Visible products sorted by menu position (unset last), then id
pub fn visible_products(products: Vec<Product>, now: DateTime<Utc>) -> Vec<Product> {
    let mut visible: Vec<Product> = products
        .into_iter()
        .filter(|p| is_visible(p, now))
        .collect();
    visible.sort_by(|a, b| {
        let key = |p: &Product| (p.order.is_none(), p.order, p.id);
        key(a).cmp(&key(b))
    });
    visible
}

/// Pinned restaurants first (oldest pin first), then the rest in their original order
pub fn order_pinned_first(restaurants: Vec<Restaurant>) -> Vec<Restaurant> {
    let (mut pinned, unpinned): (Vec<_>, Vec<_>) =
        restaurants.into_iter().partition(|r| r.is_pinned());
    // stable: equal pin instants keep store order
    pinned.sort_by_key(|r| r.pinned_at);
    pinned.extend(unpinned);
    pinned
}
