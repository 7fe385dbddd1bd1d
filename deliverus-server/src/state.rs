//! Application state

use std::sync::Arc;

use crate::auth::{JwtConfig, JwtService};
use crate::config::Config;
use crate::db::{
    MemoryStore, OrderRepository, PgStore, ProductRepository, RestaurantRepository,
    UserRepository,
};
use crate::error::BoxError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub restaurants: Arc<dyn RestaurantRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub jwt: Arc<JwtService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Connect the configured store and build the state
    pub async fn new(config: Config) -> Result<Self, BoxError> {
        match config.database_url.as_deref() {
            Some(url) => {
                let store = PgStore::connect(url, config.database_max_connections).await?;
                tracing::info!("Connected to PostgreSQL, migrations applied");
                Ok(Self::with_store(store, config))
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using the in-memory store");
                Ok(Self::with_store(MemoryStore::new(), config))
            }
        }
    }

    /// Build the state over one store implementing every repository
    pub fn with_store<S>(store: S, config: Config) -> Self
    where
        S: UserRepository
            + RestaurantRepository
            + ProductRepository
            + OrderRepository
            + Clone
            + 'static,
    {
        let jwt = JwtService::with_config(JwtConfig::from(&config));
        Self {
            users: Arc::new(store.clone()),
            restaurants: Arc::new(store.clone()),
            products: Arc::new(store.clone()),
            orders: Arc::new(store),
            jwt: Arc::new(jwt),
            config: Arc::new(config),
        }
    }
}
