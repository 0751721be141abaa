//! Axum route handlers for comment generation, standalone humanization and history.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::generator::{generate_comments, GeneratedComment, GenerationRequest};
use crate::humanizer::burstiness::word_count;
use crate::humanizer::{HumanizeOptions, Humanizer, StyleHints};
use crate::models::NewComment;
use crate::state::AppState;
use crate::voice::analyze_post_context;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateCommentsRequest {
    pub user_id: Uuid,
    pub post_id: Uuid,
    /// Makes the humanizer's random edits reproducible.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct GenerationAnalysis {
    pub post_type: String,
    pub post_topic: String,
    pub post_sentiment: String,
    pub detected_sentiment: String,
    pub angle: String,
    pub user_tone: String,
    pub used_fallback: bool,
    pub generation_timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct GenerateCommentsResponse {
    pub comments: Vec<GeneratedComment>,
    pub analysis: GenerationAnalysis,
}

#[derive(Debug, Deserialize)]
pub struct HumanizeRequest {
    pub text: String,
    #[serde(default)]
    pub style: Option<StyleHints>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub options: Option<HumanizeOptions>,
}

#[derive(Debug, Serialize)]
pub struct HumanizeResponse {
    pub original: String,
    pub humanized: String,
    pub word_count_before: usize,
    pub word_count_after: usize,
}

#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub comment_id: Uuid,
    pub post_id: Uuid,
    pub text: String,
    pub variation: i32,
    pub confidence: f64,
    pub approach: String,
    pub quality_score: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub user_id: Uuid,
    pub total_comments: usize,
    pub comments: Vec<HistoryEntry>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/comments/generate
pub async fn handle_generate_comments(
    State(state): State<AppState>,
    Json(req): Json<GenerateCommentsRequest>,
) -> Result<Json<GenerateCommentsResponse>, AppError> {
    let user = state.store.get_user(req.user_id).await?.ok_or_else(|| {
        AppError::NotFound(format!(
            "User {} not found. Create the profile first.",
            req.user_id
        ))
    })?;
    let post = state.store.get_post(req.post_id).await?.ok_or_else(|| {
        AppError::NotFound(format!(
            "Post {} not found. Analyze the target first.",
            req.post_id
        ))
    })?;
    let target = state
        .store
        .get_target(post.target_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Target {} not found", post.target_id)))?;

    let profile = &user.voice_profile.0;
    info!(
        "Generating comments for post {} (user {}, voice source {})",
        post.id, user.id, profile.profile_source
    );

    let existing_comments = state
        .linkedin
        .get_post_comments(&post.source_post_id, state.config.max_comments_analyze)
        .await;
    let post_context = analyze_post_context(&state.llm, &post.content, &existing_comments).await;

    let outcome = generate_comments(
        &state.llm,
        &state.paraphrase,
        GenerationRequest {
            profile,
            target: &target.insights.0,
            post: &post_context,
            post_content: &post.content,
            variations: state.config.comment_variations,
            seed: req.seed,
        },
    )
    .await;

    let new_comments = outcome
        .comments
        .iter()
        .map(|c| NewComment {
            user_id: user.id,
            post_id: post.id,
            text: c.text.clone(),
            variation: c.variation as i32,
            confidence: c.confidence,
            approach: c.approach.clone(),
            quality_score: c.validation.quality_score as i32,
        })
        .collect();
    state.store.create_comments(new_comments).await?;

    Ok(Json(GenerateCommentsResponse {
        analysis: GenerationAnalysis {
            post_type: post_context.post_type,
            post_topic: post_context.main_topic,
            post_sentiment: post_context.sentiment,
            detected_sentiment: outcome.sentiment,
            angle: outcome.angle,
            user_tone: profile.tone.clone(),
            used_fallback: outcome.used_fallback,
            generation_timestamp: Utc::now(),
        },
        comments: outcome.comments,
    }))
}

/// POST /api/humanize
///
/// Runs the humanization pipeline alone, without an LLM call or the paraphrase webhook.
pub async fn handle_humanize(
    Json(req): Json<HumanizeRequest>,
) -> Result<Json<HumanizeResponse>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }

    let rng = match req.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut humanizer = Humanizer::with_rng(rng, req.options.unwrap_or_default());
    let humanized = humanizer.humanize(&req.text, &req.style.unwrap_or_default());

    Ok(Json(HumanizeResponse {
        word_count_before: word_count(&req.text),
        word_count_after: word_count(&humanized),
        original: req.text,
        humanized,
    }))
}

/// GET /api/history/:user_id
pub async fn handle_history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, AppError> {
    if state.store.get_user(user_id).await?.is_none() {
        return Err(AppError::NotFound(format!("User {user_id} not found")));
    }

    let comments: Vec<HistoryEntry> = state
        .store
        .comments_for_user(user_id)
        .await?
        .into_iter()
        .map(|c| HistoryEntry {
            comment_id: c.id,
            post_id: c.post_id,
            text: c.text,
            variation: c.variation,
            confidence: c.confidence,
            approach: c.approach,
            quality_score: c.quality_score,
            created_at: c.created_at,
        })
        .collect();

    Ok(Json(HistoryResponse {
        user_id,
        total_comments: comments.len(),
        comments,
    }))
}
