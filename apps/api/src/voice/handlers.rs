use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::linkedin::profile_store::{stored_comment_samples, to_basic_profile};
use crate::linkedin::extract_username;
use crate::llm_client::prompts::truncate_chars;
use crate::models::{NewPost, NewTarget, NewUser};
use crate::state::AppState;
use crate::voice::{analyze_target_profile, analyze_user_writing_style, TargetInsights, VoiceProfile};

/// Posts kept per target analysis.
const MAX_STORED_POSTS: usize = 20;
const POST_PREVIEW_CHARS: usize = 200;

// ────────────────────────────────────────────────────────────────────────────
// Request / response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AvailableProfile {
    pub username: String,
    pub name: String,
    pub headline: String,
    pub profile_url: String,
}

#[derive(Debug, Serialize)]
pub struct AvailableProfilesResponse {
    pub profiles: Vec<AvailableProfile>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct ProfileRequest {
    pub linkedin_url: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub name: String,
    pub headline: String,
    pub voice_profile: VoiceProfile,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct UserSummaryResponse {
    pub user_id: Uuid,
    pub username: String,
    pub name: String,
    pub headline: String,
    pub voice_profile: VoiceProfile,
    pub has_complete_profile: bool,
    pub profile_data_keys: usize,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct TargetAnalysisRequest {
    pub user_id: Uuid,
    pub target_url: String,
}

#[derive(Debug, Serialize)]
pub struct PostSummary {
    pub post_id: Uuid,
    pub content: String,
    pub posted_date: Option<DateTime<Utc>>,
    pub likes_count: i64,
    pub comments_count: i64,
}

#[derive(Debug, Serialize)]
pub struct TargetAnalysisResponse {
    pub target_id: Uuid,
    pub target_name: String,
    pub target_headline: String,
    pub insights: TargetInsights,
    pub posts_count: usize,
    pub posts: Vec<PostSummary>,
    pub has_recent_posts: bool,
    pub date_range: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/user/profiles/available
pub async fn handle_available_profiles(
    State(state): State<AppState>,
) -> Result<Json<AvailableProfilesResponse>, AppError> {
    let mut profiles = Vec::new();
    for username in state.profiles.list().await? {
        match state.profiles.load(&username).await {
            Ok(Some(stored)) => {
                let basic = to_basic_profile(&stored, &username);
                profiles.push(AvailableProfile {
                    username,
                    name: basic.name,
                    headline: basic.headline,
                    profile_url: basic.profile_url,
                });
            }
            Ok(None) => {}
            Err(e) => warn!("Skipping unreadable profile {username}: {e}"),
        }
    }

    Ok(Json(AvailableProfilesResponse {
        total: profiles.len(),
        profiles,
    }))
}

/// POST /api/user/profile
///
/// Loads `<username>.json` from the profiles directory; nothing is fetched
/// from LinkedIn for the user.
pub async fn handle_create_user_profile(
    State(state): State<AppState>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let username = extract_username(&req.linkedin_url);
    if username.is_empty() {
        return Err(AppError::Validation("linkedin_url is empty".to_string()));
    }

    let stored = state.profiles.load(&username).await?.ok_or_else(|| {
        AppError::NotFound(format!(
            "Profile '{username}' not found in {}. Add {username}.json first.",
            state.profiles.dir().display()
        ))
    })?;
    let field_count = stored.as_object().map_or(0, |o| o.len());
    info!("Loaded profile {username} with {field_count} top-level fields");

    let basic = to_basic_profile(&stored, &username);
    let samples = stored_comment_samples(&stored);
    let voice = analyze_user_writing_style(&state.llm, &stored, &samples).await;

    let user = state
        .store
        .create_user(NewUser {
            linkedin_url: req.linkedin_url,
            username: username.clone(),
            name: basic.name,
            headline: basic.headline,
            about: basic.about,
            profile_data: stored,
            voice_profile: voice,
        })
        .await?;
    info!("Stored user {} ({username}), voice source {}", user.id, user.voice_profile.profile_source);

    Ok(Json(ProfileResponse {
        user_id: user.id,
        name: user.name,
        headline: user.headline,
        voice_profile: user.voice_profile.0,
        message: format!("Profile loaded from {username}.json with {field_count} fields"),
    }))
}

/// GET /api/user/profile/:id
pub async fn handle_get_user_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserSummaryResponse>, AppError> {
    let user = state
        .store
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;

    let profile_data_keys = user.profile_data.0.as_object().map_or(0, |o| o.len());
    Ok(Json(UserSummaryResponse {
        user_id: user.id,
        username: user.username,
        name: user.name,
        headline: user.headline,
        voice_profile: user.voice_profile.0,
        has_complete_profile: profile_data_keys > 0,
        profile_data_keys,
        created_at: user.created_at,
    }))
}

/// POST /api/target/analyze
pub async fn handle_analyze_target(
    State(state): State<AppState>,
    Json(req): Json<TargetAnalysisRequest>,
) -> Result<Json<TargetAnalysisResponse>, AppError> {
    if state.store.get_user(req.user_id).await?.is_none() {
        return Err(AppError::NotFound(format!("User {} not found", req.user_id)));
    }
    info!("Analyzing target {}", req.target_url);

    let profile = state.linkedin.get_target_profile(&req.target_url).await;
    if profile.is_empty() {
        return Err(AppError::NotFound(format!(
            "Target profile {} not found",
            req.target_url
        )));
    }
    let insights = analyze_target_profile(&state.llm, &profile).await;

    let batch = state
        .linkedin
        .get_target_posts(
            &req.target_url,
            state.config.max_posts_fetch,
            state.config.recent_post_days,
        )
        .await;

    let target = state
        .store
        .create_target(NewTarget {
            user_id: req.user_id,
            linkedin_url: req.target_url.clone(),
            name: profile.name.clone(),
            headline: profile.headline.clone(),
            about: profile.about.clone(),
            insights: insights.clone(),
        })
        .await?;

    if !batch.has_recent_posts || batch.posts.is_empty() {
        warn!("No recent posts found for {}", profile.name);
        return Ok(Json(TargetAnalysisResponse {
            target_id: target.id,
            target_name: target.name,
            target_headline: target.headline,
            insights,
            posts_count: 0,
            posts: Vec::new(),
            has_recent_posts: false,
            date_range: batch.date_range,
            warning: Some(format!(
                "No recent posts found in the last {} days",
                state.config.recent_post_days
            )),
            message: Some(
                batch
                    .message
                    .unwrap_or_else(|| "User may be inactive or hasn't posted recently.".to_string()),
            ),
        }));
    }

    let new_posts = batch
        .posts
        .iter()
        .take(MAX_STORED_POSTS)
        .map(|p| NewPost::from_fetched(target.id, p))
        .collect();
    let rows = state.store.create_posts(new_posts).await?;
    info!("Stored {} recent posts from {}", rows.len(), target.name);

    let posts: Vec<PostSummary> = rows
        .into_iter()
        .map(|row| PostSummary {
            post_id: row.id,
            content: preview(&row.content),
            posted_date: row.posted_at,
            likes_count: row.likes_count,
            comments_count: row.comments_count,
        })
        .collect();

    Ok(Json(TargetAnalysisResponse {
        target_id: target.id,
        target_name: target.name,
        target_headline: target.headline,
        insights,
        posts_count: posts.len(),
        posts,
        has_recent_posts: true,
        date_range: batch.date_range,
        warning: None,
        message: batch.message,
    }))
}

fn preview(content: &str) -> String {
    let cut = truncate_chars(content, POST_PREVIEW_CHARS);
    if cut.len() < content.len() {
        format!("{cut}...")
    } else {
        cut.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_long_posts_only() {
        assert_eq!(preview("short"), "short");
        let long = "é".repeat(250);
        let cut = preview(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), POST_PREVIEW_CHARS + 3);
    }
}
