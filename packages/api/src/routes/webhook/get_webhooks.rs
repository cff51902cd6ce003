use axum::{Extension, Json, extract::State};

use crate::{
    error::ApiError,
    middleware::jwt::AppUser,
    routes::DataResponse,
    state::AppState,
    webhook::{ExternalWebhookView, format_webhooks},
};

#[tracing::instrument(name = "GET /api/v2/webhooks", skip(state, user))]
pub async fn get_webhooks(
    State(state): State<AppState>,
    Extension(user): Extension<AppUser>,
) -> Result<Json<DataResponse<Vec<ExternalWebhookView>>>, ApiError> {
    let team = user.team()?;

    let records = state.store.list_for_team(team).await?;
    let webhooks = format_webhooks(&records);

    if webhooks.len() != records.len() {
        tracing::warn!(
            team = %team,
            stored = records.len(),
            returned = webhooks.len(),
            "Some webhooks failed validation and were omitted"
        );
    }

    Ok(Json(DataResponse { data: webhooks }))
}
