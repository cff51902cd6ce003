//! `SeaORM` Entity for Webhook
//!
//! Legacy rows may lack `name`, `service` or the timestamps, and `service` is
//! free text. Rows like that load fine and are rejected by
//! [`crate::webhook::format_webhook`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(schema_name = "public", table_name = "webhooks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owning team
    pub team: Uuid,
    #[sea_orm(column_type = "Text", nullable)]
    pub name: Option<String>,
    /// One of `slack`, `incidentio`, `generic` for well-formed rows
    #[sea_orm(column_type = "Text", nullable)]
    pub service: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Extra request headers, only meaningful for generic webhooks
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub headers: Option<Json>,
    /// Request body template, only meaningful for generic webhooks
    #[sea_orm(column_type = "Text", nullable)]
    pub body: Option<String>,
    #[sea_orm(column_name = "queryParams", column_type = "JsonBinary", nullable)]
    pub query_params: Option<Json>,
    #[sea_orm(column_name = "createdAt", nullable)]
    pub created_at: Option<DateTimeUtc>,
    #[sea_orm(column_name = "updatedAt", nullable)]
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
