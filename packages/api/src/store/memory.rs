//! In-memory webhook store
//!
//! Rows are returned in insertion order, which stands in for a database's
//! natural retrieval order.

use async_trait::async_trait;
use parking_lot::RwLock;
use sea_orm::prelude::Uuid;

use super::{StoreError, WebhookStore};
use crate::entity::{user, webhook};

#[derive(Debug, Default)]
pub struct MemoryWebhookStore {
    webhooks: RwLock<Vec<webhook::Model>>,
    users: RwLock<Vec<user::Model>>,
}

impl MemoryWebhookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_webhook(&self, webhook: webhook::Model) {
        self.webhooks.write().push(webhook);
    }

    pub fn insert_user(&self, user: user::Model) {
        self.users.write().push(user);
    }
}

#[async_trait]
impl WebhookStore for MemoryWebhookStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list_for_team(&self, team: Uuid) -> Result<Vec<webhook::Model>, StoreError> {
        Ok(self
            .webhooks
            .read()
            .iter()
            .filter(|webhook| webhook.team == team)
            .cloned()
            .collect())
    }

    async fn find_for_team(
        &self,
        team: Uuid,
        id: Uuid,
    ) -> Result<Option<webhook::Model>, StoreError> {
        Ok(self
            .webhooks
            .read()
            .iter()
            .find(|webhook| webhook.id == id && webhook.team == team)
            .cloned())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<user::Model>, StoreError> {
        Ok(self.users.read().iter().find(|user| user.id == id).cloned())
    }

    async fn find_user_by_access_key_hash(
        &self,
        hash: &str,
    ) -> Result<Option<user::Model>, StoreError> {
        Ok(self
            .users
            .read()
            .iter()
            .find(|user| user.access_key_hash == hash)
            .cloned())
    }
}
