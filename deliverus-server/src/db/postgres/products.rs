use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::models::{NewProduct, Product};
use sqlx::PgConnection;

use super::PgStore;
use crate::db::{ProductRepository, RepoError, RepoResult};
use crate::pricing;

const PRODUCT_COLUMNS: &str = "id, restaurant_id, name, description, base_price, price, \
    availability, visible_until, sort_order, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    restaurant_id: i64,
    name: String,
    description: Option<String>,
    base_price: Decimal,
    price: Decimal,
    availability: bool,
    visible_until: Option<DateTime<Utc>>,
    sort_order: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            restaurant_id: row.restaurant_id,
            name: row.name,
            description: row.description,
            base_price: row.base_price,
            price: row.price,
            availability: row.availability,
            visible_until: row.visible_until,
            order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Percentage of a restaurant, share-locked until the transaction ends so a
/// concurrent percentage change waits for (or is waited on by) this writer
async fn locked_percentage(conn: &mut PgConnection, restaurant_id: i64) -> RepoResult<Decimal> {
    let row: Option<(Decimal,)> =
        sqlx::query_as("SELECT percentage FROM restaurants WHERE id = $1 FOR SHARE")
            .bind(restaurant_id)
            .fetch_optional(conn)
            .await?;
    row.map(|(p,)| p)
        .ok_or_else(|| RepoError::NotFound(format!("restaurant {restaurant_id}")))
}

#[async_trait]
impl ProductRepository for PgStore {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Product>> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Product::from))
    }

    async fn find_by_restaurant(&self, restaurant_id: i64) -> RepoResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE restaurant_id = $1 ORDER BY id"
        ))
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_most_ordered(&self) -> RepoResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             JOIN (SELECT product_id, SUM(quantity) AS ordered
                   FROM order_products GROUP BY product_id) totals
               ON totals.product_id = products.id
             ORDER BY totals.ordered DESC, products.id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn create(&self, data: NewProduct) -> RepoResult<Product> {
        let mut tx = self.pool.begin().await?;
        let percentage = locked_percentage(&mut *tx, data.restaurant_id).await?;
        let price = pricing::compute_price(data.base_price, percentage)?;

        let row: ProductRow = sqlx::query_as(&format!(
            "INSERT INTO products (restaurant_id, name, description, base_price, price,
                availability, visible_until, sort_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(data.restaurant_id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.base_price)
        .bind(price)
        .bind(data.availability)
        .bind(data.visible_until)
        .bind(data.order)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(row.into())
    }

    async fn update(&self, product: &Product) -> RepoResult<Product> {
        let mut tx = self.pool.begin().await?;
        let restaurant_id: Option<(i64,)> =
            sqlx::query_as("SELECT restaurant_id FROM products WHERE id = $1")
                .bind(product.id)
                .fetch_optional(&mut *tx)
                .await?;
        let (restaurant_id,) =
            restaurant_id.ok_or_else(|| RepoError::NotFound(format!("product {}", product.id)))?;
        let percentage = locked_percentage(&mut *tx, restaurant_id).await?;
        let price = pricing::compute_price(product.base_price, percentage)?;

        let row: ProductRow = sqlx::query_as(&format!(
            "UPDATE products SET name = $2, description = $3, base_price = $4, price = $5,
                availability = $6, visible_until = $7, sort_order = $8, updated_at = NOW()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.base_price)
        .bind(price)
        .bind(product.availability)
        .bind(product.visible_until)
        .bind(product.order)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(row.into())
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn is_ordered(&self, id: i64) -> RepoResult<bool> {
        let row: (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM order_products WHERE product_id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(row.0)
    }
}
