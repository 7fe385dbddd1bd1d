//! PostgreSQL store (sqlx)

mod orders;
mod products;
mod restaurants;
mod users;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::RepoError;
use shared::models::UnknownVariant;

/// Repository implementations over one connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and apply pending migrations
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, RepoError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(Self { pool })
    }
}

impl From<UnknownVariant> for RepoError {
    fn from(err: UnknownVariant) -> Self {
        RepoError::Database(err.to_string())
    }
}
