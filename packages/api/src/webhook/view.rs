//! External representation of a webhook, one variant per integration.
//!
//! The variant structs below are the whitelist for the public API: a field
//! that is not declared here is never emitted, whatever the stored row holds.
//! Unknown keys are dropped while deserializing, and optional fields that are
//! absent stay absent on the way out (no `null`s).

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Supported webhook integrations
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookService {
    #[serde(rename = "slack")]
    Slack,
    #[serde(rename = "incidentio")]
    IncidentIo,
    #[serde(rename = "generic")]
    Generic,
}

impl WebhookService {
    pub const ALL: [WebhookService; 3] = [
        WebhookService::Slack,
        WebhookService::IncidentIo,
        WebhookService::Generic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookService::Slack => "slack",
            WebhookService::IncidentIo => "incidentio",
            WebhookService::Generic => "generic",
        }
    }
}

impl fmt::Display for WebhookService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown webhook service '{0}'")]
pub struct UnknownService(pub String);

impl FromStr for WebhookService {
    type Err = UnknownService;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WebhookService::ALL
            .into_iter()
            .find(|service| service.as_str() == s)
            .ok_or_else(|| UnknownService(s.to_string()))
    }
}

/// Fields every integration exposes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookBase {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Generic HTTP webhooks additionally expose the request the team configured
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericWebhook {
    #[serde(flatten)]
    pub base: WebhookBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "service")]
pub enum ExternalWebhookView {
    #[serde(rename = "slack")]
    Slack(WebhookBase),
    #[serde(rename = "incidentio")]
    IncidentIo(WebhookBase),
    #[serde(rename = "generic")]
    Generic(GenericWebhook),
}

impl ExternalWebhookView {
    pub fn service(&self) -> WebhookService {
        match self {
            ExternalWebhookView::Slack(_) => WebhookService::Slack,
            ExternalWebhookView::IncidentIo(_) => WebhookService::IncidentIo,
            ExternalWebhookView::Generic(_) => WebhookService::Generic,
        }
    }

    pub fn base(&self) -> &WebhookBase {
        match self {
            ExternalWebhookView::Slack(base) | ExternalWebhookView::IncidentIo(base) => base,
            ExternalWebhookView::Generic(generic) => &generic.base,
        }
    }

    pub fn id(&self) -> &str {
        &self.base().id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn service_names_round_trip_through_from_str() {
        for service in WebhookService::ALL {
            assert_eq!(service.as_str().parse::<WebhookService>(), Ok(service));
        }
        assert_eq!(
            "Slack".parse::<WebhookService>(),
            Err(UnknownService("Slack".to_string()))
        );
    }

    #[test]
    fn service_serializes_as_wire_name() {
        assert_eq!(
            serde_json::to_value(WebhookService::IncidentIo).unwrap(),
            json!("incidentio")
        );
    }

    #[test]
    fn slack_variant_ignores_generic_fields() {
        let view: ExternalWebhookView = serde_json::from_value(json!({
            "id": "a",
            "name": "alerts",
            "service": "slack",
            "headers": { "Authorization": "secret" },
            "body": "{{title}}",
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-01T00:00:00.000Z"
        }))
        .unwrap();

        assert_eq!(view.service(), WebhookService::Slack);
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            json!({
                "service": "slack",
                "id": "a",
                "name": "alerts",
                "createdAt": "2024-01-01T00:00:00.000Z",
                "updatedAt": "2024-01-01T00:00:00.000Z"
            })
        );
    }

    #[test]
    fn generic_variant_keeps_headers_and_body() {
        let view: ExternalWebhookView = serde_json::from_value(json!({
            "id": "b",
            "name": "pager",
            "service": "generic",
            "url": "https://example.com/hook",
            "headers": { "X": "Y" },
            "body": "{{title}}",
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-02T00:00:00.000Z"
        }))
        .unwrap();

        let ExternalWebhookView::Generic(generic) = &view else {
            panic!("expected generic variant, got {:?}", view);
        };
        assert_eq!(generic.body.as_deref(), Some("{{title}}"));
        assert_eq!(
            generic.headers.as_ref().and_then(|h| h.get("X")).map(String::as_str),
            Some("Y")
        );
        assert_eq!(view.id(), "b");
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let result = serde_json::from_value::<ExternalWebhookView>(json!({
            "id": "c",
            "name": "teams",
            "service": "msteams",
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-01T00:00:00.000Z"
        }));
        assert!(result.is_err());
    }
}
