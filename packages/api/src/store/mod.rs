//! Webhook storage abstraction
//!
//! - **PostgreSQL**: SeaORM over the `webhooks` and `users` tables
//! - **Memory**: insertion ordered, for local development and tests
//!
//! ## Configuration
//!
//! ```bash
//! # Postgres backend, falls back to memory when unset
//! DATABASE_URL=postgres://...
//! DATABASE_MAX_CONNECTIONS=10
//! ```

mod memory;
mod postgres;

pub use memory::MemoryWebhookStore;
pub use postgres::PostgresWebhookStore;

use async_trait::async_trait;
use sea_orm::prelude::Uuid;
use std::{fmt::Debug, sync::Arc};

use crate::entity::{user, webhook};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<sea_orm::DbErr> for StoreError {
    fn from(err: sea_orm::DbErr) -> Self {
        StoreError::Database(err.to_string())
    }
}

#[async_trait]
pub trait WebhookStore: Send + Sync + Debug {
    /// Get backend name for logging
    fn backend_name(&self) -> &'static str;

    /// All webhooks owned by `team`, in the backend's natural order
    async fn list_for_team(&self, team: Uuid) -> Result<Vec<webhook::Model>, StoreError>;

    /// A single webhook, only if it is owned by `team`
    async fn find_for_team(
        &self,
        team: Uuid,
        id: Uuid,
    ) -> Result<Option<webhook::Model>, StoreError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<user::Model>, StoreError>;

    async fn find_user_by_access_key_hash(
        &self,
        hash: &str,
    ) -> Result<Option<user::Model>, StoreError>;
}

/// Configuration for creating a webhook store
#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub sqlx_logging: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: 10,
            sqlx_logging: false,
        }
    }
}

/// Create a store for the given configuration
pub async fn create_store(config: StoreConfig) -> Result<Arc<dyn WebhookStore>, StoreError> {
    match config.database_url {
        Some(url) => {
            let store =
                PostgresWebhookStore::connect(&url, config.max_connections, config.sqlx_logging)
                    .await?;
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory webhook store");
            Ok(Arc::new(MemoryWebhookStore::new()))
        }
    }
}
