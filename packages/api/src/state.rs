use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use sea_orm::prelude::Uuid;
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};

use crate::store::WebhookStore;

pub type AppState = Arc<State>;

/// Cached auth result for a bearer token
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CachedAuth {
    /// Signed JWT, valid until `exp` (unix seconds)
    Jwt {
        sub: String,
        team: Option<Uuid>,
        exp: i64,
    },
    /// User access key
    AccessKey { user_id: Uuid, team: Option<Uuid> },
    /// Unknown, malformed or expired credential
    Invalid,
}

/// Claims accepted on dashboard-issued JWTs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    pub exp: i64,
}

#[derive(Clone)]
pub struct AuthConfig {
    decoding_key: DecodingKey,
    /// Time a resolved credential stays in [`State::auth_cache`]
    pub cache_ttl: Duration,
}

impl AuthConfig {
    pub fn new(jwt_secret: &str, cache_ttl: Duration) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            cache_ttl,
        }
    }
}

pub struct State {
    pub store: Arc<dyn WebhookStore>,
    pub auth: AuthConfig,
    /// Auth token cache: token_hash -> CachedAuth
    pub auth_cache: moka::sync::Cache<String, CachedAuth>,
}

impl State {
    pub fn new(store: Arc<dyn WebhookStore>, auth: AuthConfig) -> Self {
        let auth_cache = moka::sync::Cache::builder()
            .max_capacity(10_000)
            .time_to_live(auth.cache_ttl)
            .build();

        Self {
            store,
            auth,
            auth_cache,
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        validation.leeway = 0;
        let decoded = decode::<Claims>(token, &self.auth.decoding_key, &validation)?;
        Ok(decoded.claims)
    }
}
