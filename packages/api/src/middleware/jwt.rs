use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use sea_orm::prelude::Uuid;

use crate::{
    error::ApiError,
    state::{AppState, CachedAuth},
};

#[derive(Debug, Clone)]
pub struct JwtUser {
    pub sub: String,
    pub team: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct AccessKeyUser {
    pub user_id: Uuid,
    pub team: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub enum AppUser {
    Jwt(JwtUser),
    AccessKey(AccessKeyUser),
    Unauthorized,
}

impl AppUser {
    /// Team the caller acts for: 401 without credentials, 403 without a team
    pub fn team(&self) -> Result<Uuid, ApiError> {
        let team = match self {
            AppUser::Jwt(user) => user.team,
            AppUser::AccessKey(user) => user.team,
            AppUser::Unauthorized => {
                return Err(crate::unauthorized!("Missing or invalid credentials"));
            }
        };
        team.ok_or_else(|| crate::forbidden!("User {} is not a member of a team", self))
    }
}

impl std::fmt::Display for AppUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppUser::Jwt(user) => write!(f, "{}", user.sub),
            AppUser::AccessKey(user) => write!(f, "{}", user.user_id),
            AppUser::Unauthorized => write!(f, "anonymous"),
        }
    }
}

impl From<CachedAuth> for AppUser {
    fn from(cached: CachedAuth) -> Self {
        match cached {
            CachedAuth::Jwt { sub, team, .. } => AppUser::Jwt(JwtUser { sub, team }),
            CachedAuth::AccessKey { user_id, team } => {
                AppUser::AccessKey(AccessKeyUser { user_id, team })
            }
            CachedAuth::Invalid => AppUser::Unauthorized,
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

fn is_jwt(token: &str) -> bool {
    token.split('.').count() == 3
}

fn token_hash(token: &str) -> String {
    blake3::hash(token.as_bytes()).to_hex().to_string()
}

async fn resolve_jwt(state: &AppState, token: &str) -> Result<CachedAuth, ApiError> {
    let claims = match state.validate_token(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!("Rejected JWT: {}", err);
            return Ok(CachedAuth::Invalid);
        }
    };

    let team = match claims.team.as_deref() {
        Some(team) => match Uuid::parse_str(team) {
            Ok(team) => Some(team),
            Err(_) => {
                tracing::debug!(sub = %claims.sub, "Rejected JWT with malformed team claim");
                return Ok(CachedAuth::Invalid);
            }
        },
        None => match Uuid::parse_str(&claims.sub) {
            Ok(user_id) => state
                .store
                .find_user(user_id)
                .await?
                .and_then(|user| user.team),
            Err(_) => None,
        },
    };

    Ok(CachedAuth::Jwt {
        sub: claims.sub,
        team,
        exp: claims.exp,
    })
}

async fn resolve_access_key(state: &AppState, key_hash: &str) -> Result<CachedAuth, ApiError> {
    let user = state.store.find_user_by_access_key_hash(key_hash).await?;
    Ok(match user {
        Some(user) => CachedAuth::AccessKey {
            user_id: user.id,
            team: user.team,
        },
        None => CachedAuth::Invalid,
    })
}

/// Resolve a bearer token, consulting the auth cache first
pub async fn authenticate(state: &AppState, token: &str) -> Result<AppUser, ApiError> {
    let hash = token_hash(token);

    if let Some(cached) = state.auth_cache.get(&hash) {
        let expired = matches!(cached, CachedAuth::Jwt { exp, .. } if exp <= chrono::Utc::now().timestamp());
        if !expired {
            return Ok(cached.into());
        }
        state.auth_cache.invalidate(&hash);
    }

    let resolved = if is_jwt(token) {
        resolve_jwt(state, token).await?
    } else {
        resolve_access_key(state, &hash).await?
    };

    // Rejections are not cached so a freshly issued key works immediately
    if resolved != CachedAuth::Invalid {
        state.auth_cache.insert(hash, resolved.clone());
    }
    Ok(resolved.into())
}

pub async fn jwt_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response<Body>, ApiError> {
    let user = match bearer_token(request.headers()) {
        Some(token) => authenticate(&state, token).await?,
        None => AppUser::Unauthorized,
    };

    request.extensions_mut().insert::<AppUser>(user);
    Ok(next.run(request).await)
}
