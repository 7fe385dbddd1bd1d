//! Database access layer
//!
//! One repository trait per aggregate. Two stores implement all of them:
//! [`postgres::PgStore`] (sqlx) and [`memory::MemoryStore`] (development and tests).

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::{
    NewOrder, NewProduct, NewRestaurant, NewUser, Order, OrderStatus, Product, Restaurant, User,
};
use thiserror::Error;

use crate::pricing::PricingError;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Row still referenced by another table
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Derived value outside the representable range
    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("row".into()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Duplicate(db.message().to_string())
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                RepoError::Conflict(db.message().to_string())
            }
            // numeric_value_out_of_range
            sqlx::Error::Database(db) if db.code().as_deref() == Some("22003") => {
                RepoError::OutOfRange(db.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<PricingError> for RepoError {
    fn from(err: PricingError) -> Self {
        RepoError::OutOfRange(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    /// Fails with [`RepoError::Duplicate`] when the email is taken
    async fn create(&self, data: NewUser) -> RepoResult<User>;
    /// Profile fields only; email, password and type are kept
    async fn update(&self, user: &User) -> RepoResult<User>;
    /// Fails with [`RepoError::Conflict`] while restaurants or orders reference the user
    async fn delete(&self, id: i64) -> RepoResult<bool>;
}

#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    async fn find_all(&self) -> RepoResult<Vec<Restaurant>>;
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Restaurant>>;
    /// Restaurants of one owner, in creation order
    async fn find_by_owner(&self, user_id: i64) -> RepoResult<Vec<Restaurant>>;
    async fn create(&self, data: NewRestaurant) -> RepoResult<Restaurant>;
    /// Store the edited restaurant and, in the same transaction, recompute
    /// every product price from its base price and the stored percentage
    async fn update(&self, restaurant: &Restaurant) -> RepoResult<Restaurant>;
    async fn set_pinned_at(
        &self,
        id: i64,
        pinned_at: Option<DateTime<Utc>>,
    ) -> RepoResult<Restaurant>;
    /// Removes the restaurant and its products
    async fn delete(&self, id: i64) -> RepoResult<bool>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Product>>;
    async fn find_by_restaurant(&self, restaurant_id: i64) -> RepoResult<Vec<Product>>;
    /// Products that appear in orders, by total ordered quantity (descending), ties by id
    async fn find_most_ordered(&self) -> RepoResult<Vec<Product>>;
    /// `price` is derived from the restaurant's current percentage while its row is locked
    async fn create(&self, data: NewProduct) -> RepoResult<Product>;
    /// Like [`create`](Self::create), `product.price` is ignored and derived again
    async fn update(&self, product: &Product) -> RepoResult<Product>;
    async fn delete(&self, id: i64) -> RepoResult<bool>;
    /// Whether any order line references the product
    async fn is_ordered(&self, id: i64) -> RepoResult<bool>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Order>>;
    /// Orders placed by a customer, newest first
    async fn find_by_customer(&self, user_id: i64) -> RepoResult<Vec<Order>>;
    /// Orders of a restaurant, newest first
    async fn find_by_restaurant(&self, restaurant_id: i64) -> RepoResult<Vec<Order>>;
    async fn exists_for_restaurant(&self, restaurant_id: i64) -> RepoResult<bool>;
    /// Insert the order and its lines in one transaction
    async fn create(&self, data: NewOrder) -> RepoResult<Order>;
    /// Move to `status`, stamping the matching timestamp with `at`
    async fn update_status(
        &self,
        id: i64,
        status: OrderStatus,
        at: DateTime<Utc>,
    ) -> RepoResult<Order>;
}
