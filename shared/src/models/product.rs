//! Product Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product entity
///
/// `price` is derived from `base_price` and the owning restaurant's
/// percentage; it is persisted so listings never recompute it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    /// Restaurant reference
    pub restaurant_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Price set by the owner, before the restaurant percentage
    pub base_price: Decimal,
    /// Price charged to customers
    pub price: Decimal,
    pub availability: bool,
    /// Last instant the product is listed; null = no limit
    pub visible_until: Option<DateTime<Utc>>,
    /// Display position inside the restaurant menu
    pub order: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    /// Base price (accepted as `price` or `basePrice`)
    #[serde(alias = "basePrice")]
    pub price: Decimal,
    pub restaurant_id: i64,
    pub availability: Option<bool>,
    pub visible_until: Option<DateTime<Utc>>,
    pub order: Option<i32>,
}

/// Validated product handed to the store, which derives `price`
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub restaurant_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub availability: bool,
    pub visible_until: Option<DateTime<Utc>>,
    pub order: Option<i32>,
}

/// Update product payload
///
/// Absent fields are left unchanged; `visibleUntil: null` clears the limit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub description: Option<Option<String>>,
    /// New base price (accepted as `price` or `basePrice`)
    #[serde(alias = "basePrice")]
    pub price: Option<Decimal>,
    pub availability: Option<bool>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub visible_until: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub order: Option<Option<i32>>,
    /// Products cannot move between restaurants
    pub restaurant_id: Option<i64>,
}

impl ProductUpdate {
    /// Apply the present fields onto `product`; `price` is derived by the store.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(base_price) = self.price {
            product.base_price = base_price;
        }
        if let Some(availability) = self.availability {
            product.availability = availability;
        }
        if let Some(visible_until) = self.visible_until {
            product.visible_until = visible_until;
        }
        if let Some(order) = self.order {
            product.order = order;
        }
    }
}

/// Recomputed price for one product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductPrice {
    pub product_id: i64,
    pub price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_accepts_price_or_base_price() {
        let a: ProductCreate =
            serde_json::from_str(r#"{"name":"Paella","price":12.5,"restaurantId":1}"#).unwrap();
        let b: ProductCreate =
            serde_json::from_str(r#"{"name":"Paella","basePrice":12.5,"restaurantId":1}"#)
                .unwrap();
        assert_eq!(a.price, b.price);
        assert_eq!(a.price.to_string(), "12.5");
        assert!(a.availability.is_none());
    }

    #[test]
    fn test_update_clears_visible_until() {
        let now = Utc::now();
        let mut product = Product {
            id: 1,
            restaurant_id: 1,
            name: "Gazpacho".into(),
            description: None,
            base_price: Decimal::TEN,
            price: Decimal::TEN,
            availability: true,
            visible_until: Some(now),
            order: Some(2),
            created_at: now,
            updated_at: now,
        };

        let update: ProductUpdate = serde_json::from_str(r#"{"visibleUntil":null}"#).unwrap();
        update.apply_to(&mut product);

        assert_eq!(product.visible_until, None);
        assert_eq!(product.order, Some(2));
    }

    #[test]
    fn test_product_json_carries_both_prices() {
        let now = Utc::now();
        let product = Product {
            id: 3,
            restaurant_id: 1,
            name: "Tortilla".into(),
            description: None,
            base_price: Decimal::TEN,
            price: "10.5".parse().unwrap(),
            availability: true,
            visible_until: None,
            order: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["basePrice"], 10.0);
        assert_eq!(json["price"], 10.5);
        assert_eq!(json["restaurantId"], 1);
    }
}
