//! Normalized LinkedIn records and the `ProfileSource` trait every backend implements.
//!
//! `AppState` holds an `Arc<dyn ProfileSource>`, picked at startup from `DATA_SOURCE`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Normalized data models (shared across all sources)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub headline: String,
    pub about: String,
    pub experience: Vec<Experience>,
    pub education: Vec<serde_json::Value>,
    pub skills: Vec<String>,
    pub location: String,
    pub connections: u64,
    pub followers: u64,
    pub profile_url: String,
    pub profile_picture: String,
}

impl Profile {
    /// The profile returned when a fetch fails: everything blank except the URL.
    pub fn empty(profile_url: &str) -> Self {
        Self {
            profile_url: profile_url.to_string(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.headline.is_empty() && self.about.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    pub post_id: String,
    pub content: String,
    pub posted_date: Option<DateTime<Utc>>,
    pub likes_count: u64,
    pub comments_count: u64,
    pub shares_count: u64,
    pub media_type: String,
    pub author: String,
    pub post_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostComment {
    pub comment_id: String,
    pub comment_text: String,
    pub author: String,
    pub posted_date: String,
    pub likes_count: u64,
}

/// Result of a recency-aware post fetch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostBatch {
    pub posts: Vec<Post>,
    pub has_recent_posts: bool,
    pub total_found: usize,
    pub date_range: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PostBatch {
    pub fn empty(max_days: i64, message: Option<String>) -> Self {
        Self {
            posts: Vec::new(),
            has_recent_posts: false,
            total_found: 0,
            date_range: format!("Last {max_days} days"),
            message,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// A backend that can fetch profiles, posts and post comments.
///
/// Fetches never fail outward: a source logs the problem and returns an empty
/// profile or batch, so callers can keep going with whatever data exists.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Short label for logs and the health endpoint, e.g. "rapidapi" or "mock".
    fn name(&self) -> &'static str;

    async fn fetch_profile(&self, linkedin_url: &str) -> Profile;

    /// Posts from the last `max_days` days, newest first, at most `max_posts`.
    async fn fetch_posts(&self, linkedin_url: &str, max_posts: usize, max_days: i64) -> PostBatch;

    async fn fetch_post_comments(&self, post_id: &str, max_comments: usize) -> Vec<PostComment>;
}
