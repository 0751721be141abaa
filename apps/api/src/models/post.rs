use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::linkedin::Post;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub target_id: Uuid,
    /// Id assigned by the data source; used to fetch the post's comments.
    pub source_post_id: String,
    pub post_url: String,
    pub content: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub target_id: Uuid,
    pub source_post_id: String,
    pub post_url: String,
    pub content: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub likes_count: i64,
    pub comments_count: i64,
}

impl NewPost {
    pub fn from_fetched(target_id: Uuid, post: &Post) -> Self {
        Self {
            target_id,
            source_post_id: post.post_id.clone(),
            post_url: post.post_url.clone(),
            content: post.content.clone(),
            posted_at: post.posted_date,
            likes_count: i64::try_from(post.likes_count).unwrap_or(i64::MAX),
            comments_count: i64::try_from(post.comments_count).unwrap_or(i64::MAX),
        }
    }
}
