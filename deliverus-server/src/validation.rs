//! Input validation helpers
//!
//! Validators collect every failing field before reporting, so a single 422
//! response lists all problems of a request body.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::models::{
    OrderCreate, Product, ProductCreate, ProductUpdate, RestaurantCreate, RestaurantUpdate,
    UserRegister, UserUpdate,
};
use shared::{AppError, FieldError};

use crate::pricing;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: restaurant, product
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions
pub const MAX_NOTE_LEN: usize = 1000;

/// Short identifiers: phone, postal code
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Minimum password length at registration
pub const MIN_PASSWORD_LEN: usize = 3;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Collector ───────────────────────────────────────────────────────

/// Accumulates field errors
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure on `field`
    pub fn reject(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors.push(FieldError::new(field, message));
        self
    }

    /// Record the outcome of a single-field check
    pub fn check(&mut self, result: Result<(), FieldError>) -> &mut Self {
        if let Err(e) = result {
            self.errors.push(e);
        }
        self
    }

    /// Required string: non-blank and within the length limit
    pub fn required_text(&mut self, field: &str, value: &str, max_len: usize) -> &mut Self {
        if value.trim().is_empty() {
            return self.reject(field, format!("{field} must not be empty"));
        }
        self.max_len(field, value, max_len)
    }

    /// Optional string: when present, within the length limit
    pub fn optional_text(&mut self, field: &str, value: Option<&str>, max_len: usize) -> &mut Self {
        match value {
            Some(v) => self.max_len(field, v, max_len),
            None => self,
        }
    }

    fn max_len(&mut self, field: &str, value: &str, max_len: usize) -> &mut Self {
        if value.len() > max_len {
            let len = value.len();
            return self.reject(field, format!("{field} is too long ({len} chars, max {max_len})"));
        }
        self
    }

    pub fn non_negative(&mut self, field: &str, value: Decimal) -> &mut Self {
        if value < Decimal::ZERO {
            return self.reject(field, format!("{field} must be greater than or equal to 0"));
        }
        self
    }

    /// Money amount in `[0, MAX_PRICE]`
    pub fn price(&mut self, field: &str, value: Decimal) -> &mut Self {
        if value > pricing::MAX_PRICE {
            let max = pricing::MAX_PRICE;
            return self.reject(field, format!("{field} must not exceed {max}"));
        }
        self.non_negative(field, value)
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if !looks_like_email(value) {
            return self.reject(field, format!("{field} must be a valid email address"));
        }
        self.max_len(field, value, MAX_EMAIL_LEN)
    }

    /// Fields that clients may not set
    pub fn absent<T>(&mut self, field: &str, value: &Option<T>) -> &mut Self {
        if value.is_some() {
            return self.reject(field, format!("{field} cannot be set"));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok` when nothing failed, otherwise one 422 error carrying every field
    pub fn finish(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::invalid_fields(self.errors))
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

// ── Domain validators ───────────────────────────────────────────────

pub fn validate_restaurant_create(data: &RestaurantCreate) -> Result<(), AppError> {
    let mut v = Validator::new();
    v.required_text("name", &data.name, MAX_NAME_LEN)
        .optional_text("description", data.description.as_deref(), MAX_NOTE_LEN)
        .required_text("address", &data.address, MAX_ADDRESS_LEN)
        .required_text("postalCode", &data.postal_code, MAX_SHORT_TEXT_LEN)
        .optional_text("url", data.url.as_deref(), MAX_URL_LEN)
        .price("shippingCosts", data.shipping_costs)
        .optional_text("phone", data.phone.as_deref(), MAX_SHORT_TEXT_LEN)
        .absent("userId", &data.user_id);
    if let Some(email) = data.email.as_deref() {
        v.email("email", email);
    }
    if let Some(percentage) = data.percentage {
        v.check(pricing::validate_percentage(percentage));
    }
    v.finish()
}

pub fn validate_restaurant_update(data: &RestaurantUpdate) -> Result<(), AppError> {
    let mut v = Validator::new();
    if let Some(name) = &data.name {
        v.required_text("name", name, MAX_NAME_LEN);
    }
    if let Some(description) = &data.description {
        v.optional_text("description", description.as_deref(), MAX_NOTE_LEN);
    }
    if let Some(address) = &data.address {
        v.required_text("address", address, MAX_ADDRESS_LEN);
    }
    if let Some(postal_code) = &data.postal_code {
        v.required_text("postalCode", postal_code, MAX_SHORT_TEXT_LEN);
    }
    if let Some(url) = &data.url {
        v.optional_text("url", url.as_deref(), MAX_URL_LEN);
    }
    if let Some(shipping_costs) = data.shipping_costs {
        v.price("shippingCosts", shipping_costs);
    }
    if let Some(Some(email)) = &data.email {
        v.email("email", email);
    }
    if let Some(phone) = &data.phone {
        v.optional_text("phone", phone.as_deref(), MAX_SHORT_TEXT_LEN);
    }
    if let Some(percentage) = data.percentage {
        v.check(pricing::validate_percentage(percentage));
    }
    v.absent("userId", &data.user_id);
    v.finish()
}

pub fn validate_product_create(data: &ProductCreate, now: DateTime<Utc>) -> Result<(), AppError> {
    let mut v = Validator::new();
    v.required_text("name", &data.name, MAX_NAME_LEN)
        .optional_text("description", data.description.as_deref(), MAX_NOTE_LEN)
        .price("price", data.price)
        .check(pricing::validate_visible_until(data.visible_until, now))
        .check(pricing::validate_visibility_availability(
            data.availability.unwrap_or(true),
            data.visible_until,
        ));
    v.finish()
}

/// `merged` is the product with `data` already applied.
pub fn validate_product_update(
    data: &ProductUpdate,
    merged: &Product,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let mut v = Validator::new();
    if let Some(name) = &data.name {
        v.required_text("name", name, MAX_NAME_LEN);
    }
    if let Some(description) = &data.description {
        v.optional_text("description", description.as_deref(), MAX_NOTE_LEN);
    }
    if let Some(price) = data.price {
        v.price("price", price);
    }
    if let Some(visible_until) = data.visible_until {
        v.check(pricing::validate_visible_until(visible_until, now));
    }
    v.check(pricing::validate_visibility_availability(
        merged.availability,
        merged.visible_until,
    ))
    .absent("restaurantId", &data.restaurant_id);
    v.finish()
}

pub fn validate_register(data: &UserRegister) -> Result<(), AppError> {
    let mut v = Validator::new();
    v.required_text("firstName", &data.first_name, MAX_NAME_LEN)
        .required_text("lastName", &data.last_name, MAX_NAME_LEN)
        .email("email", &data.email)
        .required_text("password", &data.password, MAX_PASSWORD_LEN)
        .required_text("phone", &data.phone, MAX_SHORT_TEXT_LEN)
        .required_text("address", &data.address, MAX_ADDRESS_LEN)
        .required_text("postalCode", &data.postal_code, MAX_SHORT_TEXT_LEN)
        .optional_text("avatar", data.avatar.as_deref(), MAX_URL_LEN);
    if data.password.len() < MIN_PASSWORD_LEN {
        v.reject(
            "password",
            format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }
    v.finish()
}

pub fn validate_user_update(data: &UserUpdate) -> Result<(), AppError> {
    let mut v = Validator::new();
    if let Some(first_name) = &data.first_name {
        v.required_text("firstName", first_name, MAX_NAME_LEN);
    }
    if let Some(last_name) = &data.last_name {
        v.required_text("lastName", last_name, MAX_NAME_LEN);
    }
    if let Some(phone) = &data.phone {
        v.required_text("phone", phone, MAX_SHORT_TEXT_LEN);
    }
    if let Some(address) = &data.address {
        v.required_text("address", address, MAX_ADDRESS_LEN);
    }
    if let Some(postal_code) = &data.postal_code {
        v.required_text("postalCode", postal_code, MAX_SHORT_TEXT_LEN);
    }
    if let Some(avatar) = &data.avatar {
        v.optional_text("avatar", avatar.as_deref(), MAX_URL_LEN);
    }
    v.absent("email", &data.email);
    v.finish()
}

/// Shape checks only; products are resolved against the store by the order service.
pub fn validate_order_shape(data: &OrderCreate, v: &mut Validator) {
    v.required_text("address", &data.address, MAX_ADDRESS_LEN);
    if data.products.is_empty() {
        v.reject("products", "The order must contain at least one product");
    }
    if data.products.iter().any(|l| l.quantity < 1) {
        v.reject("products", "Every product quantity must be at least 1");
    }
    if data.products.iter().any(|l| l.quantity > pricing::MAX_QUANTITY) {
        let max = pricing::MAX_QUANTITY;
        v.reject("products", format!("Every product quantity must be at most {max}"));
    }
    let mut ids: Vec<i64> = data.products.iter().map(|l| l.product_id).collect();
    ids.sort_unstable();
    if ids.windows(2).any(|w| w[0] == w[1]) {
        v.reject("products", "A product may appear only once per order");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use shared::models::OrderLineCreate;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn restaurant_create() -> RestaurantCreate {
        RestaurantCreate {
            name: "Casa Felix".into(),
            description: None,
            address: "Av. Reina Mercedes 1".into(),
            postal_code: "41012".into(),
            url: None,
            shipping_costs: dec("1.5"),
            email: Some("felix@example.com".into()),
            phone: None,
            status: None,
            percentage: None,
            pinned: false,
            user_id: None,
        }
    }

    fn fields(err: AppError) -> Vec<String> {
        err.field_errors().into_iter().map(|e| e.field).collect()
    }

    #[test]
    fn test_collects_every_field() {
        let mut data = restaurant_create();
        data.name = "  ".into();
        data.shipping_costs = dec("-1");
        data.percentage = Some(dec("7"));
        data.email = Some("not-an-email".into());

        let err = validate_restaurant_create(&data).unwrap_err();
        assert_eq!(
            fields(err),
            vec!["name", "shippingCosts", "email", "percentage"]
        );
    }

    #[test]
    fn test_valid_restaurant_passes() {
        assert!(validate_restaurant_create(&restaurant_create()).is_ok());
    }

    #[test]
    fn test_restaurant_update_rejects_out_of_range_percentage() {
        let update = RestaurantUpdate {
            percentage: Some(dec("-5.5")),
            ..Default::default()
        };
        assert_eq!(fields(validate_restaurant_update(&update).unwrap_err()), vec!["percentage"]);

        let update = RestaurantUpdate {
            percentage: Some(dec("-5")),
            ..Default::default()
        };
        assert!(validate_restaurant_update(&update).is_ok());
    }

    #[test]
    fn test_restaurant_update_rejects_owner_change() {
        let update = RestaurantUpdate {
            user_id: Some(2),
            ..Default::default()
        };
        assert_eq!(fields(validate_restaurant_update(&update).unwrap_err()), vec!["userId"]);
    }

    #[test]
    fn test_product_create_exclusive_availability() {
        let now = Utc::now();
        let data = ProductCreate {
            name: "Croquetas".into(),
            description: None,
            price: dec("6"),
            restaurant_id: 1,
            availability: Some(false),
            visible_until: Some(now + Duration::days(1)),
            order: None,
        };
        assert_eq!(
            fields(validate_product_create(&data, now).unwrap_err()),
            vec!["availability"]
        );
    }

    #[test]
    fn test_product_create_past_visibility() {
        let now = Utc::now();
        let data = ProductCreate {
            name: "Croquetas".into(),
            description: None,
            price: dec("-1"),
            restaurant_id: 1,
            availability: None,
            visible_until: Some(now - Duration::days(1)),
            order: None,
        };
        assert_eq!(
            fields(validate_product_create(&data, now).unwrap_err()),
            vec!["price", "visibleUntil"]
        );
    }

    #[test]
    fn test_price_upper_bound() {
        let now = Utc::now();
        let mut data = ProductCreate {
            name: "Croquetas".into(),
            description: None,
            price: pricing::MAX_PRICE,
            restaurant_id: 1,
            availability: None,
            visible_until: None,
            order: None,
        };
        assert!(validate_product_create(&data, now).is_ok());

        data.price = dec("79000000000000000000000000000");
        assert_eq!(fields(validate_product_create(&data, now).unwrap_err()), vec!["price"]);

        let mut restaurant = restaurant_create();
        restaurant.shipping_costs = pricing::MAX_PRICE + Decimal::ONE;
        assert_eq!(
            fields(validate_restaurant_create(&restaurant).unwrap_err()),
            vec!["shippingCosts"]
        );
    }

    #[test]
    fn test_register_checks() {
        let data = UserRegister {
            first_name: "Ana".into(),
            last_name: "".into(),
            email: "ana@".into(),
            password: "pw".into(),
            phone: "600".into(),
            address: "Calle".into(),
            postal_code: "41001".into(),
            avatar: None,
        };
        assert_eq!(
            fields(validate_register(&data).unwrap_err()),
            vec!["lastName", "email", "password"]
        );
    }

    #[test]
    fn test_user_update_checks() {
        let data = UserUpdate {
            first_name: Some(" ".into()),
            email: Some("new@example.com".into()),
            ..Default::default()
        };
        assert_eq!(
            fields(validate_user_update(&data).unwrap_err()),
            vec!["firstName", "email"]
        );
        assert!(validate_user_update(&UserUpdate::default()).is_ok());
    }

    #[test]
    fn test_order_shape() {
        let data = OrderCreate {
            restaurant_id: 1,
            address: "".into(),
            products: vec![
                OrderLineCreate { product_id: 1, quantity: 0 },
                OrderLineCreate { product_id: 1, quantity: 2 },
            ],
        };
        let mut v = Validator::new();
        validate_order_shape(&data, &mut v);
        assert_eq!(
            fields(v.finish().unwrap_err()),
            vec!["address", "products", "products"]
        );
    }

    #[test]
    fn test_order_quantity_upper_bound() {
        let mut data = OrderCreate {
            restaurant_id: 1,
            address: "Calle".into(),
            products: vec![OrderLineCreate { product_id: 1, quantity: pricing::MAX_QUANTITY }],
        };
        let mut v = Validator::new();
        validate_order_shape(&data, &mut v);
        assert!(v.is_empty());

        data.products[0].quantity = pricing::MAX_QUANTITY + 1;
        let mut v = Validator::new();
        validate_order_shape(&data, &mut v);
        assert_eq!(fields(v.finish().unwrap_err()), vec!["products"]);
    }

    #[test]
    fn test_email_shapes() {
        assert!(looks_like_email("a@b.es"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.es"));
        assert!(!looks_like_email("a@@b.es"));
    }
}
