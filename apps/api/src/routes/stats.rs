use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::prompts::truncate_chars;
use crate::state::AppState;
use crate::store::StoreStats;

const CONTENT_PREVIEW_CHARS: usize = 50;

#[derive(Debug, Serialize)]
pub struct UsageStatsResponse {
    #[serde(flatten)]
    pub stats: StoreStats,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct UserDebug {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub has_complete_profile: bool,
    pub voice_source: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct TargetDebug {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct PostDebug {
    pub id: Uuid,
    pub target_id: Uuid,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct DatabaseDebugResponse {
    pub backend: &'static str,
    pub users: Vec<UserDebug>,
    pub targets: Vec<TargetDebug>,
    pub posts: Vec<PostDebug>,
    #[serde(flatten)]
    pub stats: StoreStats,
}

/// GET /api/usage-stats
pub async fn usage_stats_handler(
    State(state): State<AppState>,
) -> Result<Json<UsageStatsResponse>, AppError> {
    Ok(Json(UsageStatsResponse {
        stats: state.store.stats().await?,
        timestamp: Utc::now(),
    }))
}

/// GET /api/debug/database
pub async fn debug_database_handler(
    State(state): State<AppState>,
) -> Result<Json<DatabaseDebugResponse>, AppError> {
    let users = state
        .store
        .list_users()
        .await?
        .into_iter()
        .map(|u| UserDebug {
            id: u.id,
            has_complete_profile: u.profile_data.0.as_object().is_some_and(|o| !o.is_empty()),
            voice_source: u.voice_profile.0.profile_source,
            name: u.name,
            username: u.username,
            created_at: u.created_at,
        })
        .collect();

    let targets = state
        .store
        .list_targets()
        .await?
        .into_iter()
        .map(|t| TargetDebug {
            id: t.id,
            user_id: t.user_id,
            name: t.name,
            created_at: t.created_at,
        })
        .collect();

    let posts = state
        .store
        .list_posts()
        .await?
        .into_iter()
        .map(|p| PostDebug {
            id: p.id,
            target_id: p.target_id,
            content: format!("{}...", truncate_chars(&p.content, CONTENT_PREVIEW_CHARS)),
        })
        .collect();

    Ok(Json(DatabaseDebugResponse {
        backend: state.store.backend(),
        users,
        targets,
        posts,
        stats: state.store.stats().await?,
    }))
}
