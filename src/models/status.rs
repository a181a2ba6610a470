//! Status models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::status;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusResponse {
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<status::Model> for StatusResponse {
    fn from(m: status::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            color: m.color,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Status definition, used by the API and by `initial_statuses.json`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateStatusRequest {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub name: Option<String>,
    pub color: Option<String>,
}
