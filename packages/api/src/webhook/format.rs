use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::entity::webhook;

use super::view::{ExternalWebhookView, WebhookService};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The row names a service this API does not know about (schema drift)
    #[error("unknown webhook service '{service}'")]
    UnknownService { service: String },
    /// A required field is missing or a field has the wrong shape
    #[error("malformed webhook record: {reason}")]
    Malformed { reason: String },
}

fn timestamp(value: &DateTime<Utc>) -> Value {
    Value::String(value.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Plain JSON form of a stored row.
///
/// Identifiers become strings, timestamps become RFC 3339 strings and absent
/// columns are left out. Nothing is filtered here: `team` and `queryParams`
/// are carried along and dropped by the schema.
pub fn to_document(record: &webhook::Model) -> Map<String, Value> {
    let mut document = Map::new();
    document.insert("id".into(), Value::String(record.id.to_string()));
    document.insert("team".into(), Value::String(record.team.to_string()));

    let text_fields = [
        ("name", &record.name),
        ("service", &record.service),
        ("url", &record.url),
        ("description", &record.description),
        ("body", &record.body),
    ];
    for (key, value) in text_fields {
        if let Some(value) = value {
            document.insert(key.into(), Value::String(value.clone()));
        }
    }

    let json_fields = [
        ("headers", &record.headers),
        ("queryParams", &record.query_params),
    ];
    for (key, value) in json_fields {
        match value {
            None | Some(Value::Null) => {}
            Some(value) => {
                document.insert(key.into(), value.clone());
            }
        }
    }

    if let Some(created_at) = &record.created_at {
        document.insert("createdAt".into(), timestamp(created_at));
    }
    if let Some(updated_at) = &record.updated_at {
        document.insert("updatedAt".into(), timestamp(updated_at));
    }

    document
}

/// Project a stored webhook onto the fields its service is allowed to expose.
pub fn format_webhook(record: &webhook::Model) -> Result<ExternalWebhookView, FormatError> {
    if let Some(service) = record.service.as_deref() {
        service
            .parse::<WebhookService>()
            .map_err(|err| FormatError::UnknownService { service: err.0 })?;
    }

    serde_json::from_value(Value::Object(to_document(record))).map_err(|err| {
        FormatError::Malformed {
            reason: err.to_string(),
        }
    })
}

/// Format every record, dropping the ones that do not validate.
///
/// Output order follows `records`.
pub fn format_webhooks(records: &[webhook::Model]) -> Vec<ExternalWebhookView> {
    records
        .iter()
        .filter_map(|record| match format_webhook(record) {
            Ok(view) => Some(view),
            Err(FormatError::UnknownService { service }) => {
                tracing::warn!(
                    webhook_id = %record.id,
                    team = %record.team,
                    service = %service,
                    "Skipping webhook with unknown service"
                );
                None
            }
            Err(FormatError::Malformed { reason }) => {
                tracing::warn!(
                    webhook_id = %record.id,
                    team = %record.team,
                    reason = %reason,
                    "Skipping malformed webhook"
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sea_orm::prelude::Uuid;
    use serde_json::json;

    fn team() -> Uuid {
        Uuid::from_u128(0xA)
    }

    fn record(id: u128, service: &str) -> webhook::Model {
        webhook::Model {
            id: Uuid::from_u128(id),
            team: team(),
            name: Some(format!("hook-{}", id)),
            service: Some(service.to_string()),
            url: None,
            description: None,
            headers: None,
            body: None,
            query_params: None,
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            updated_at: Some(Utc.with_ymd_and_hms(2024, 2, 1, 12, 30, 0).unwrap()),
        }
    }

    fn as_json(view: &ExternalWebhookView) -> Value {
        serde_json::to_value(view).unwrap()
    }

    #[test]
    fn slack_record_matches_expected_shape() {
        let mut slack = record(1, "slack");
        slack.name = Some("T1".to_string());
        slack.url = Some("https://hooks.slack.com/services/T000/B000/XXX".to_string());

        let view = format_webhook(&slack).unwrap();

        assert_eq!(
            as_json(&view),
            json!({
                "id": "00000000-0000-0000-0000-000000000001",
                "name": "T1",
                "service": "slack",
                "url": "https://hooks.slack.com/services/T000/B000/XXX",
                "createdAt": "2024-01-01T00:00:00.000Z",
                "updatedAt": "2024-02-01T12:30:00.000Z"
            })
        );
    }

    #[test]
    fn non_generic_services_never_expose_headers_or_body() {
        for service in ["slack", "incidentio"] {
            let mut stored = record(2, service);
            stored.headers = Some(json!({ "Authorization": "Bearer leaked" }));
            stored.body = Some("{\"secret\": true}".to_string());

            let view = as_json(&format_webhook(&stored).unwrap());
            let object = view.as_object().unwrap();

            assert!(!object.contains_key("headers"), "{} leaked headers", service);
            assert!(!object.contains_key("body"), "{} leaked body", service);
            assert_eq!(object["service"], json!(service));
        }
    }

    #[test]
    fn generic_record_keeps_configured_request() {
        let mut generic = record(3, "generic");
        generic.url = Some("https://example.com/hook".to_string());
        generic.headers = Some(json!({ "X": "Y" }));
        generic.body = Some("{{title}}".to_string());

        let view = as_json(&format_webhook(&generic).unwrap());

        assert_eq!(view["headers"], json!({ "X": "Y" }));
        assert_eq!(view["body"], json!("{{title}}"));
    }

    #[test]
    fn generic_record_without_request_omits_keys() {
        let view = as_json(&format_webhook(&record(4, "generic")).unwrap());
        let object = view.as_object().unwrap();

        assert!(!object.contains_key("headers"));
        assert!(!object.contains_key("body"));
        assert!(!object.contains_key("url"));
        assert!(!object.contains_key("description"));
    }

    #[test]
    fn null_headers_are_treated_as_absent() {
        let mut generic = record(5, "generic");
        generic.headers = Some(Value::Null);

        let view = as_json(&format_webhook(&generic).unwrap());

        assert!(view.get("headers").is_none());
    }

    #[test]
    fn internal_columns_are_stripped() {
        let mut generic = record(6, "generic");
        generic.query_params = Some(json!({ "token": "abc" }));

        let view = as_json(&format_webhook(&generic).unwrap());
        let object = view.as_object().unwrap();

        assert!(!object.contains_key("team"));
        assert!(!object.contains_key("queryParams"));
    }

    #[test]
    fn missing_required_fields_are_malformed() {
        let mut no_name = record(7, "slack");
        no_name.name = None;
        let mut no_created = record(8, "slack");
        no_created.created_at = None;
        let mut no_updated = record(9, "generic");
        no_updated.updated_at = None;
        let mut no_service = record(10, "slack");
        no_service.service = None;

        for stored in [no_name, no_created, no_updated, no_service] {
            assert!(
                matches!(format_webhook(&stored), Err(FormatError::Malformed { .. })),
                "{:?} should be malformed",
                stored
            );
        }
    }

    #[test]
    fn unknown_service_is_reported_separately() {
        assert_eq!(
            format_webhook(&record(11, "msteams")),
            Err(FormatError::UnknownService {
                service: "msteams".to_string()
            })
        );
    }

    #[test]
    fn badly_shaped_headers_only_matter_for_generic() {
        let mut generic = record(12, "generic");
        generic.headers = Some(json!({ "X-Retry": 3 }));
        assert!(matches!(
            format_webhook(&generic),
            Err(FormatError::Malformed { .. })
        ));

        let mut slack = record(13, "slack");
        slack.headers = Some(json!({ "X-Retry": 3 }));
        assert!(format_webhook(&slack).is_ok());
    }

    #[test]
    fn formatting_is_idempotent() {
        let mut generic = record(14, "generic");
        generic.headers = Some(json!({ "b": "2", "a": "1" }));
        generic.body = Some("payload".to_string());

        let first = serde_json::to_vec(&format_webhook(&generic).unwrap()).unwrap();
        let second = serde_json::to_vec(&format_webhook(&generic).unwrap()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn collection_drops_invalid_records_and_keeps_order() {
        let mut broken = record(21, "slack");
        broken.name = None;
        let records = vec![
            record(20, "generic"),
            broken,
            record(22, "teams"),
            record(23, "incidentio"),
            record(24, "slack"),
        ];

        let views = format_webhooks(&records);

        let ids: Vec<&str> = views.iter().map(ExternalWebhookView::id).collect();
        assert_eq!(
            ids,
            vec![
                Uuid::from_u128(20).to_string(),
                Uuid::from_u128(23).to_string(),
                Uuid::from_u128(24).to_string(),
            ]
        );
    }

    #[test]
    fn empty_collection_formats_to_empty_list() {
        assert!(format_webhooks(&[]).is_empty());
    }
}
