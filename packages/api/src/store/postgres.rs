//! PostgreSQL webhook store using SeaORM

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, QueryFilter,
    prelude::Uuid,
};
use std::{sync::Arc, time::Duration};

use super::{StoreError, WebhookStore};
use crate::entity::{prelude::*, user, webhook};

#[derive(Debug, Clone)]
pub struct PostgresWebhookStore {
    db: Arc<DatabaseConnection>,
}

impl PostgresWebhookStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn connect(
        url: &str,
        max_connections: u32,
        sqlx_logging: bool,
    ) -> Result<Self, StoreError> {
        if max_connections == 0 {
            return Err(StoreError::Configuration(
                "max_connections must be at least 1".into(),
            ));
        }

        let mut opt = ConnectOptions::new(url.to_owned());
        opt.max_connections(max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(8))
            .sqlx_logging(sqlx_logging);

        let db = Database::connect(opt).await?;
        tracing::info!(max_connections, "Connected to webhook database");
        Ok(Self::new(Arc::new(db)))
    }
}

#[async_trait]
impl WebhookStore for PostgresWebhookStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn list_for_team(&self, team: Uuid) -> Result<Vec<webhook::Model>, StoreError> {
        let webhooks = Webhook::find()
            .filter(webhook::Column::Team.eq(team))
            .all(self.db.as_ref())
            .await?;
        Ok(webhooks)
    }

    async fn find_for_team(
        &self,
        team: Uuid,
        id: Uuid,
    ) -> Result<Option<webhook::Model>, StoreError> {
        let webhook = Webhook::find_by_id(id)
            .filter(webhook::Column::Team.eq(team))
            .one(self.db.as_ref())
            .await?;
        Ok(webhook)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<user::Model>, StoreError> {
        Ok(User::find_by_id(id).one(self.db.as_ref()).await?)
    }

    async fn find_user_by_access_key_hash(
        &self,
        hash: &str,
    ) -> Result<Option<user::Model>, StoreError> {
        let user = User::find()
            .filter(user::Column::AccessKeyHash.eq(hash))
            .one(self.db.as_ref())
            .await?;
        Ok(user)
    }
}
