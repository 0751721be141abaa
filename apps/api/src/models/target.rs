use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::voice::TargetInsights;

/// A person whose posts the user comments on.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TargetRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub linkedin_url: String,
    pub name: String,
    pub headline: String,
    pub about: String,
    pub insights: Json<TargetInsights>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTarget {
    pub user_id: Uuid,
    pub linkedin_url: String,
    pub name: String,
    pub headline: String,
    pub about: String,
    pub insights: TargetInsights,
}
