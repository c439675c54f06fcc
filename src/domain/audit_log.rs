use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::AuditLogId;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuditLogEntry {
    pub id: AuditLogId,
    #[serde(alias = "user")]
    pub actor: String,
    pub action: String,
    #[serde(default, alias = "object")]
    pub target: Option<String>,
    #[serde(alias = "date")]
    pub created_at: DateTime<Utc>,
}
