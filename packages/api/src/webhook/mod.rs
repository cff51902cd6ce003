//! Public projection of stored webhooks
//!
//! [`view`] declares what each integration may expose, [`format`] turns
//! stored rows into those views.

pub mod format;
pub mod view;

pub use format::{FormatError, format_webhook, format_webhooks};
pub use view::{ExternalWebhookView, GenericWebhook, WebhookBase, WebhookService};
