use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::models::{NewRestaurant, Restaurant};

use super::PgStore;
use crate::db::{RepoError, RepoResult, RestaurantRepository};

const RESTAURANT_COLUMNS: &str = "id, name, description, address, postal_code, url, \
    shipping_costs, email, phone, status, percentage, pinned_at, user_id, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct RestaurantRow {
    id: i64,
    name: String,
    description: Option<String>,
    address: String,
    postal_code: String,
    url: Option<String>,
    shipping_costs: Decimal,
    email: Option<String>,
    phone: Option<String>,
    status: String,
    percentage: Decimal,
    pinned_at: Option<DateTime<Utc>>,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RestaurantRow> for Restaurant {
    type Error = RepoError;

    fn try_from(row: RestaurantRow) -> Result<Self, Self::Error> {
        Ok(Restaurant {
            id: row.id,
            name: row.name,
            description: row.description,
            address: row.address,
            postal_code: row.postal_code,
            url: row.url,
            shipping_costs: row.shipping_costs,
            email: row.email,
            phone: row.phone,
            status: row.status.parse()?,
            percentage: row.percentage,
            pinned_at: row.pinned_at,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_restaurants(rows: Vec<RestaurantRow>) -> RepoResult<Vec<Restaurant>> {
    rows.into_iter().map(Restaurant::try_from).collect()
}

#[async_trait]
impl RestaurantRepository for PgStore {
    async fn find_all(&self) -> RepoResult<Vec<Restaurant>> {
        let rows: Vec<RestaurantRow> = sqlx::query_as(&format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurants ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        into_restaurants(rows)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Restaurant>> {
        let row: Option<RestaurantRow> = sqlx::query_as(&format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Restaurant::try_from).transpose()
    }

    async fn find_by_owner(&self, user_id: i64) -> RepoResult<Vec<Restaurant>> {
        let rows: Vec<RestaurantRow> = sqlx::query_as(&format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        into_restaurants(rows)
    }

    async fn create(&self, data: NewRestaurant) -> RepoResult<Restaurant> {
        let row: RestaurantRow = sqlx::query_as(&format!(
            "INSERT INTO restaurants (name, description, address, postal_code, url,
                shipping_costs, email, phone, status, percentage, pinned_at, user_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {RESTAURANT_COLUMNS}"
        ))
        .bind(&data.name)
        .bind(&data.description)
        .bind(&data.address)
        .bind(&data.postal_code)
        .bind(&data.url)
        .bind(data.shipping_costs)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(data.status.as_str())
        .bind(data.percentage)
        .bind(data.pinned_at)
        .bind(data.user_id)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn update(&self, restaurant: &Restaurant) -> RepoResult<Restaurant> {
        // The restaurant row lock is held until commit; product writers take a
        // share lock on it, so they see either the old or the new percentage in full.
        let mut tx = self.pool.begin().await?;

        let row: RestaurantRow = sqlx::query_as(&format!(
            "UPDATE restaurants SET name = $2, description = $3, address = $4,
                postal_code = $5, url = $6, shipping_costs = $7, email = $8, phone = $9,
                status = $10, percentage = $11, updated_at = NOW()
             WHERE id = $1
             RETURNING {RESTAURANT_COLUMNS}"
        ))
        .bind(restaurant.id)
        .bind(&restaurant.name)
        .bind(&restaurant.description)
        .bind(&restaurant.address)
        .bind(&restaurant.postal_code)
        .bind(&restaurant.url)
        .bind(restaurant.shipping_costs)
        .bind(&restaurant.email)
        .bind(&restaurant.phone)
        .bind(restaurant.status.as_str())
        .bind(restaurant.percentage)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("restaurant {}", restaurant.id)))?;

        sqlx::query(
            "UPDATE products SET price = base_price + base_price * $2 / 100, updated_at = NOW()
             WHERE restaurant_id = $1 AND price <> base_price + base_price * $2 / 100",
        )
        .bind(restaurant.id)
        .bind(row.percentage)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        row.try_into()
    }

    async fn set_pinned_at(
        &self,
        id: i64,
        pinned_at: Option<DateTime<Utc>>,
    ) -> RepoResult<Restaurant> {
        let row: Option<RestaurantRow> = sqlx::query_as(&format!(
            "UPDATE restaurants SET pinned_at = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {RESTAURANT_COLUMNS}"
        ))
        .bind(id)
        .bind(pinned_at)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| RepoError::NotFound(format!("restaurant {id}")))?
            .try_into()
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        // products go with the restaurant (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM restaurants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
