use axum::{
    Extension, Json,
    extract::{Path, State},
};
use sea_orm::prelude::Uuid;

use crate::{
    error::ApiError,
    middleware::jwt::AppUser,
    not_found,
    routes::DataResponse,
    state::AppState,
    webhook::{ExternalWebhookView, format_webhook},
};

#[tracing::instrument(name = "GET /api/v2/webhooks/{webhook_id}", skip(state, user))]
pub async fn get_webhook(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
    Path(webhook_id): Path<String>,
) -> Result<Json<DataResponse<ExternalWebhookView>>, ApiError> {
    let team = user.team()?;

    let id = Uuid::parse_str(&webhook_id)
        .map_err(|_| not_found!("Webhook {} not found", webhook_id))?;

    let record = state
        .store
        .find_for_team(team, id)
        .await?
        .ok_or_else(|| not_found!("Webhook {} not found", webhook_id))?;

    // A stored row that does not validate is reported as missing, never as a 500
    let view = format_webhook(&record).map_err(|err| {
        tracing::warn!(webhook_id = %id, team = %team, error = %err, "Skipping invalid webhook");
        not_found!("Webhook {} not found", webhook_id)
    })?;

    Ok(Json(DataResponse { data: view }))
}
