//! In-memory store
//!
//! Used when no `DATABASE_URL` is configured (development) and by the test
//! suite. A single mutex over all tables gives every operation the same
//! all-or-nothing behaviour as a PostgreSQL transaction.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use shared::models::{
    NewOrder, NewProduct, NewRestaurant, NewUser, Order, OrderStatus, Product, Restaurant, User,
};

use super::{
    OrderRepository, ProductRepository, RepoError, RepoResult, RestaurantRepository,
    UserRepository,
};
use crate::pricing;

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: Vec<User>,
    restaurants: Vec<Restaurant>,
    products: Vec<Product>,
    orders: Vec<Order>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn percentage_of(&self, restaurant_id: i64) -> RepoResult<rust_decimal::Decimal> {
        self.restaurants
            .iter()
            .find(|r| r.id == restaurant_id)
            .map(|r| r.percentage)
            .ok_or_else(|| RepoError::NotFound(format!("restaurant {restaurant_id}")))
    }
}

/// Cloneable handle; clones share the same tables
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    orders
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        Ok(self.tables.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .tables
            .lock()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, data: NewUser) -> RepoResult<User> {
        let mut t = self.tables.lock();
        if t.users.iter().any(|u| u.email == data.email) {
            return Err(RepoError::Duplicate(format!("email {}", data.email)));
        }
        let user = User {
            id: t.next_id(),
            first_name: data.first_name,
            last_name: data.last_name,
            email: data.email,
            phone: data.phone,
            address: data.address,
            postal_code: data.postal_code,
            avatar: data.avatar,
            user_type: data.user_type,
            password_hash: data.password_hash,
            created_at: Utc::now(),
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> RepoResult<User> {
        let mut t = self.tables.lock();
        let stored = t
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| RepoError::NotFound(format!("user {}", user.id)))?;
        stored.first_name = user.first_name.clone();
        stored.last_name = user.last_name.clone();
        stored.phone = user.phone.clone();
        stored.address = user.address.clone();
        stored.postal_code = user.postal_code.clone();
        stored.avatar = user.avatar.clone();
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let mut t = self.tables.lock();
        if t.restaurants.iter().any(|r| r.user_id == id) || t.orders.iter().any(|o| o.user_id == id)
        {
            return Err(RepoError::Conflict(format!("user {id} is still referenced")));
        }
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        Ok(t.users.len() != before)
    }
}

#[async_trait]
impl RestaurantRepository for MemoryStore {
    async fn find_all(&self) -> RepoResult<Vec<Restaurant>> {
        Ok(self.tables.lock().restaurants.clone())
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Restaurant>> {
        Ok(self
            .tables
            .lock()
            .restaurants
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn find_by_owner(&self, user_id: i64) -> RepoResult<Vec<Restaurant>> {
        Ok(self
            .tables
            .lock()
            .restaurants
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create(&self, data: NewRestaurant) -> RepoResult<Restaurant> {
        let mut t = self.tables.lock();
        let now = Utc::now();
        let restaurant = Restaurant {
            id: t.next_id(),
            name: data.name,
            description: data.description,
            address: data.address,
            postal_code: data.postal_code,
            url: data.url,
            shipping_costs: data.shipping_costs,
            email: data.email,
            phone: data.phone,
            status: data.status,
            percentage: data.percentage,
            pinned_at: data.pinned_at,
            user_id: data.user_id,
            created_at: now,
            updated_at: now,
        };
        t.restaurants.push(restaurant.clone());
        Ok(restaurant)
    }

    async fn update(&self, restaurant: &Restaurant) -> RepoResult<Restaurant> {
        let mut t = self.tables.lock();
        let now = Utc::now();

        // priced before anything is written, so an overflow leaves the tables untouched
        let products: Vec<Product> = t
            .products
            .iter()
            .filter(|p| p.restaurant_id == restaurant.id)
            .cloned()
            .collect();
        let prices = pricing::reprice(&products, restaurant.percentage)?;

        let stored = t
            .restaurants
            .iter_mut()
            .find(|r| r.id == restaurant.id)
            .ok_or_else(|| RepoError::NotFound(format!("restaurant {}", restaurant.id)))?;
        *stored = Restaurant {
            updated_at: now,
            ..restaurant.clone()
        };
        let updated = stored.clone();

        for price in prices {
            if let Some(p) = t.products.iter_mut().find(|p| p.id == price.product_id)
                && p.price != price.price
            {
                p.price = price.price;
                p.updated_at = now;
            }
        }
        Ok(updated)
    }

    async fn set_pinned_at(
        &self,
        id: i64,
        pinned_at: Option<DateTime<Utc>>,
    ) -> RepoResult<Restaurant> {
        let mut t = self.tables.lock();
        let stored = t
            .restaurants
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| RepoError::NotFound(format!("restaurant {id}")))?;
        stored.pinned_at = pinned_at;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let mut t = self.tables.lock();
        let before = t.restaurants.len();
        t.restaurants.retain(|r| r.id != id);
        if t.restaurants.len() == before {
            return Ok(false);
        }
        t.products.retain(|p| p.restaurant_id != id);
        Ok(true)
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Product>> {
        Ok(self
            .tables
            .lock()
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn find_by_restaurant(&self, restaurant_id: i64) -> RepoResult<Vec<Product>> {
        Ok(self
            .tables
            .lock()
            .products
            .iter()
            .filter(|p| p.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    async fn find_most_ordered(&self) -> RepoResult<Vec<Product>> {
        let t = self.tables.lock();
        let mut quantities: HashMap<i64, i64> = HashMap::new();
        for line in t.orders.iter().flat_map(|o| &o.products) {
            *quantities.entry(line.product_id).or_default() += i64::from(line.quantity);
        }
        let mut ranked: Vec<(i64, &Product)> = t
            .products
            .iter()
            .filter_map(|p| quantities.get(&p.id).map(|q| (*q, p)))
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.id.cmp(&b.1.id)));
        Ok(ranked.into_iter().map(|(_, p)| p.clone()).collect())
    }

    async fn create(&self, data: NewProduct) -> RepoResult<Product> {
        let mut t = self.tables.lock();
        let percentage = t.percentage_of(data.restaurant_id)?;
        let price = pricing::compute_price(data.base_price, percentage)?;
        let now = Utc::now();
        let product = Product {
            id: t.next_id(),
            restaurant_id: data.restaurant_id,
            name: data.name,
            description: data.description,
            base_price: data.base_price,
            price,
            availability: data.availability,
            visible_until: data.visible_until,
            order: data.order,
            created_at: now,
            updated_at: now,
        };
        t.products.push(product.clone());
        Ok(product)
    }

    async fn update(&self, product: &Product) -> RepoResult<Product> {
        let mut t = self.tables.lock();
        let restaurant_id = t
            .products
            .iter()
            .find(|p| p.id == product.id)
            .map(|p| p.restaurant_id)
            .ok_or_else(|| RepoError::NotFound(format!("product {}", product.id)))?;
        let price = pricing::compute_price(product.base_price, t.percentage_of(restaurant_id)?)?;

        let stored = t
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| RepoError::NotFound(format!("product {}", product.id)))?;
        *stored = Product {
            restaurant_id,
            price,
            updated_at: Utc::now(),
            ..product.clone()
        };
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let mut t = self.tables.lock();
        let before = t.products.len();
        t.products.retain(|p| p.id != id);
        Ok(t.products.len() != before)
    }

    async fn is_ordered(&self, id: i64) -> RepoResult<bool> {
        Ok(self
            .tables
            .lock()
            .orders
            .iter()
            .any(|o| o.products.iter().any(|l| l.product_id == id)))
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Order>> {
        Ok(self.tables.lock().orders.iter().find(|o| o.id == id).cloned())
    }

    async fn find_by_customer(&self, user_id: i64) -> RepoResult<Vec<Order>> {
        let orders = self
            .tables
            .lock()
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(orders))
    }

    async fn find_by_restaurant(&self, restaurant_id: i64) -> RepoResult<Vec<Order>> {
        let orders = self
            .tables
            .lock()
            .orders
            .iter()
            .filter(|o| o.restaurant_id == restaurant_id)
            .cloned()
            .collect();
        Ok(newest_first(orders))
    }

    async fn exists_for_restaurant(&self, restaurant_id: i64) -> RepoResult<bool> {
        Ok(self
            .tables
            .lock()
            .orders
            .iter()
            .any(|o| o.restaurant_id == restaurant_id))
    }

    async fn create(&self, data: NewOrder) -> RepoResult<Order> {
        let mut t = self.tables.lock();
        let order = Order {
            id: t.next_id(),
            restaurant_id: data.restaurant_id,
            user_id: data.user_id,
            status: OrderStatus::Pending,
            address: data.address,
            shipping_costs: data.shipping_costs,
            price: data.price,
            created_at: Utc::now(),
            started_at: None,
            sent_at: None,
            delivered_at: None,
            products: data.lines,
        };
        t.orders.push(order.clone());
        Ok(order)
    }

    async fn update_status(
        &self,
        id: i64,
        status: OrderStatus,
        at: DateTime<Utc>,
    ) -> RepoResult<Order> {
        let mut t = self.tables.lock();
        let order = t
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| RepoError::NotFound(format!("order {id}")))?;
        order.status = status;
        match status {
            OrderStatus::Pending => {}
            OrderStatus::Confirmed => order.started_at = Some(at),
            OrderStatus::Sent => order.sent_at = Some(at),
            OrderStatus::Delivered => order.delivered_at = Some(at),
        }
        Ok(order.clone())
    }
}
