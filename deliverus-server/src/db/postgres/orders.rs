use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::models::{NewOrder, Order, OrderLine, OrderStatus};
use sqlx::PgConnection;

use super::PgStore;
use crate::db::{OrderRepository, RepoError, RepoResult};

const ORDER_COLUMNS: &str = "id, restaurant_id, user_id, status, address, shipping_costs, \
    price, created_at, started_at, sent_at, delivered_at";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    restaurant_id: i64,
    user_id: i64,
    status: String,
    address: String,
    shipping_costs: Decimal,
    price: Decimal,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    sent_at: Option<DateTime<Utc>>,
    delivered_at: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow)]
struct OrderLineRow {
    order_id: i64,
    product_id: i64,
    quantity: i32,
    unit_price: Decimal,
}

impl OrderRow {
    fn into_order(self, products: Vec<OrderLine>) -> RepoResult<Order> {
        Ok(Order {
            id: self.id,
            restaurant_id: self.restaurant_id,
            user_id: self.user_id,
            status: self.status.parse()?,
            address: self.address,
            shipping_costs: self.shipping_costs,
            price: self.price,
            created_at: self.created_at,
            started_at: self.started_at,
            sent_at: self.sent_at,
            delivered_at: self.delivered_at,
            products,
        })
    }
}

/// Attach line items to a batch of order rows
async fn with_lines(conn: &mut PgConnection, rows: Vec<OrderRow>) -> RepoResult<Vec<Order>> {
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let lines: Vec<OrderLineRow> = sqlx::query_as(
        "SELECT order_id, product_id, quantity, unit_price
         FROM order_products
         WHERE order_id = ANY($1)
         ORDER BY order_id, product_id",
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut by_order: HashMap<i64, Vec<OrderLine>> = HashMap::new();
    for line in lines {
        by_order.entry(line.order_id).or_default().push(OrderLine {
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price: line.unit_price,
        });
    }

    rows.into_iter()
        .map(|row| {
            let products = by_order.remove(&row.id).unwrap_or_default();
            row.into_order(products)
        })
        .collect()
}

impl PgStore {
    async fn fetch_orders(&self, filter: &str, id: i64) -> RepoResult<Vec<Order>> {
        let mut conn = self.pool.acquire().await?;
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE {filter} = $1
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;
        with_lines(&mut *conn, rows).await
    }
}

#[async_trait]
impl OrderRepository for PgStore {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Order>> {
        Ok(self.fetch_orders("id", id).await?.into_iter().next())
    }

    async fn find_by_customer(&self, user_id: i64) -> RepoResult<Vec<Order>> {
        self.fetch_orders("user_id", user_id).await
    }

    async fn find_by_restaurant(&self, restaurant_id: i64) -> RepoResult<Vec<Order>> {
        self.fetch_orders("restaurant_id", restaurant_id).await
    }

    async fn exists_for_restaurant(&self, restaurant_id: i64) -> RepoResult<bool> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM orders WHERE restaurant_id = $1)")
                .bind(restaurant_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(row.0)
    }

    async fn create(&self, data: NewOrder) -> RepoResult<Order> {
        let mut tx = self.pool.begin().await?;

        let row: OrderRow = sqlx::query_as(&format!(
            "INSERT INTO orders (restaurant_id, user_id, status, address, shipping_costs, price)
             VALUES ($1, $2, 'pending', $3, $4, $5)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(data.restaurant_id)
        .bind(data.user_id)
        .bind(&data.address)
        .bind(data.shipping_costs)
        .bind(data.price)
        .fetch_one(&mut *tx)
        .await?;

        for line in &data.lines {
            sqlx::query(
                "INSERT INTO order_products (order_id, product_id, quantity, unit_price)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(row.id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        row.into_order(data.lines)
    }

    async fn update_status(
        &self,
        id: i64,
        status: OrderStatus,
        at: DateTime<Utc>,
    ) -> RepoResult<Order> {
        let mut conn = self.pool.acquire().await?;
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "UPDATE orders SET status = $2,
                started_at = CASE WHEN $2 = 'confirmed' THEN $3 ELSE started_at END,
                sent_at = CASE WHEN $2 = 'sent' THEN $3 ELSE sent_at END,
                delivered_at = CASE WHEN $2 = 'delivered' THEN $3 ELSE delivered_at END
             WHERE id = $1
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(at)
        .fetch_optional(&mut *conn)
        .await?;
        let row = row.ok_or_else(|| RepoError::NotFound(format!("order {id}")))?;

        with_lines(&mut *conn, vec![row])
            .await?
            .pop()
            .ok_or_else(|| RepoError::NotFound(format!("order {id}")))
    }
}
