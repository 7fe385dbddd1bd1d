//! Restaurant Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{Product, UnknownVariant};

/// Restaurant opening status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RestaurantStatus {
    #[serde(rename = "online")]
    Online,
    #[default]
    #[serde(rename = "offline")]
    Offline,
    #[serde(rename = "closed")]
    Closed,
    #[serde(rename = "temporarily closed")]
    TemporarilyClosed,
}

impl RestaurantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Closed => "closed",
            Self::TemporarilyClosed => "temporarily closed",
        }
    }
}

impl FromStr for RestaurantStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            "closed" => Ok(Self::Closed),
            "temporarily closed" => Ok(Self::TemporarilyClosed),
            other => Err(UnknownVariant {
                kind: "restaurant status",
                value: other.to_string(),
            }),
        }
    }
}

/// Restaurant entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub postal_code: String,
    pub url: Option<String>,
    pub shipping_costs: Decimal,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: RestaurantStatus,
    /// Price adjustment applied to every product, in percent ([-5, 5])
    pub percentage: Decimal,
    /// Set when the owner pinned the restaurant; null when not pinned
    pub pinned_at: Option<DateTime<Utc>>,
    /// Owner reference
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Restaurant {
    pub fn is_pinned(&self) -> bool {
        self.pinned_at.is_some()
    }

    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

/// Restaurant with its currently visible products
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDetail {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub products: Vec<Product>,
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantCreate {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub postal_code: String,
    pub url: Option<String>,
    pub shipping_costs: Decimal,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<RestaurantStatus>,
    pub percentage: Option<Decimal>,
    /// Pin the restaurant right away (pinnedAt = creation time)
    #[serde(default)]
    pub pinned: bool,
    /// Never accepted; the owner is the authenticated user
    pub user_id: Option<i64>,
}

/// Validated restaurant handed to the store
#[derive(Debug, Clone)]
pub struct NewRestaurant {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub postal_code: String,
    pub url: Option<String>,
    pub shipping_costs: Decimal,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: RestaurantStatus,
    pub percentage: Decimal,
    pub pinned_at: Option<DateTime<Utc>>,
    pub user_id: i64,
}

/// Update restaurant payload
///
/// Absent fields are left unchanged. `pinnedAt` is not editable here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub description: Option<Option<String>>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub url: Option<Option<String>>,
    pub shipping_costs: Option<Decimal>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub phone: Option<Option<String>>,
    pub status: Option<RestaurantStatus>,
    pub percentage: Option<Decimal>,
    /// Ownership cannot be transferred
    pub user_id: Option<i64>,
}

impl RestaurantUpdate {
    /// Apply the present fields onto `restaurant`
    pub fn apply_to(&self, restaurant: &mut Restaurant) {
        if let Some(name) = &self.name {
            restaurant.name = name.clone();
        }
        if let Some(description) = &self.description {
            restaurant.description = description.clone();
        }
        if let Some(address) = &self.address {
            restaurant.address = address.clone();
        }
        if let Some(postal_code) = &self.postal_code {
            restaurant.postal_code = postal_code.clone();
        }
        if let Some(url) = &self.url {
            restaurant.url = url.clone();
        }
        if let Some(shipping_costs) = self.shipping_costs {
            restaurant.shipping_costs = shipping_costs;
        }
        if let Some(email) = &self.email {
            restaurant.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            restaurant.phone = phone.clone();
        }
        if let Some(status) = self.status {
            restaurant.status = status;
        }
        if let Some(percentage) = self.percentage {
            restaurant.percentage = percentage;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn sample() -> Restaurant {
        let now = Utc::now();
        Restaurant {
            id: 1,
            name: "Casa Felix".into(),
            description: None,
            address: "Av. Reina Mercedes".into(),
            postal_code: "41012".into(),
            url: None,
            shipping_costs: dec("2.5"),
            email: None,
            phone: None,
            status: RestaurantStatus::Online,
            percentage: Decimal::ZERO,
            pinned_at: None,
            user_id: 7,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&RestaurantStatus::TemporarilyClosed).unwrap(),
            "\"temporarily closed\""
        );
        let status: RestaurantStatus = serde_json::from_str("\"online\"").unwrap();
        assert_eq!(status, RestaurantStatus::Online);
        assert_eq!(
            "temporarily closed".parse::<RestaurantStatus>().unwrap(),
            RestaurantStatus::TemporarilyClosed
        );
        assert!("open".parse::<RestaurantStatus>().is_err());
    }

    #[test]
    fn test_serializes_camel_case_numbers() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["postalCode"], "41012");
        assert_eq!(json["shippingCosts"], 2.5);
        assert!(json["pinnedAt"].is_null());
        assert_eq!(json["userId"], 7);
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let update: RestaurantUpdate =
            serde_json::from_str(r#"{"description": null, "percentage": 3}"#).unwrap();
        assert_eq!(update.description, Some(None));
        assert_eq!(update.url, None);

        let mut restaurant = sample();
        restaurant.description = Some("old".into());
        restaurant.url = Some("https://example.org".into());
        update.apply_to(&mut restaurant);

        assert_eq!(restaurant.description, None);
        assert_eq!(restaurant.url.as_deref(), Some("https://example.org"));
        assert_eq!(restaurant.percentage, dec("3"));
    }

    #[test]
    fn test_create_pinned_defaults_false() {
        let create: RestaurantCreate = serde_json::from_str(
            r#"{"name":"A","address":"B","postalCode":"1","shippingCosts":1}"#,
        )
        .unwrap();
        assert!(!create.pinned);
        assert!(create.percentage.is_none());
    }
}
