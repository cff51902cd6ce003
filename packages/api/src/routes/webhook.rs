use axum::{Router, routing::get};

use crate::state::AppState;

pub mod get_webhook;
pub mod get_webhooks;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_webhooks::get_webhooks))
        .route("/{webhook_id}", get(get_webhook::get_webhook))
}
