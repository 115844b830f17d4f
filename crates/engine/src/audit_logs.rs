//! Audit trail. Written after the audited operation commits.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub action: String,
    pub user_id: Option<Uuid>,
    pub ip: Option<String>,
    pub details: Option<serde_json::Value>,
}

impl AuditEntry {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            user_id: None,
            ip: None,
            details: None,
        }
    }

    #[must_use]
    pub fn user_id(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    #[must_use]
    pub fn ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    #[must_use]
    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub action: String,
    pub user_id: Option<Uuid>,
    pub ip: Option<String>,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub action: String,
    pub user_id: Option<Uuid>,
    pub ip: Option<String>,
    pub details: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&AuditEntry> for ActiveModel {
    fn from(value: &AuditEntry) -> Self {
        Self {
            id: ActiveValue::Set(Uuid::new_v4()),
            action: ActiveValue::Set(value.action.clone()),
            user_id: ActiveValue::Set(value.user_id),
            ip: ActiveValue::Set(value.ip.clone()),
            details: ActiveValue::Set(value.details.as_ref().map(ToString::to_string)),
            created_at: ActiveValue::Set(Utc::now()),
        }
    }
}

impl From<Model> for AuditRecord {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            action: model.action,
            user_id: model.user_id,
            ip: model.ip,
            details: model.details,
            created_at: model.created_at,
        }
    }
}
