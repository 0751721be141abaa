//! In-process store. Everything is lost on restart.

use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    CommentRow, NewComment, NewPost, NewTarget, NewUser, PostRow, TargetRow, UserRow,
};
use crate::store::{Store, StoreStats};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserRow>,
    targets: HashMap<Uuid, TargetRow>,
    posts: HashMap<Uuid, PostRow>,
    comments: HashMap<Uuid, CommentRow>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by_creation<T: Clone>(
    rows: &HashMap<Uuid, T>,
    created_at: impl Fn(&T) -> chrono::DateTime<Utc>,
) -> Vec<T> {
    let mut out: Vec<T> = rows.values().cloned().collect();
    out.sort_by_key(|row| created_at(row));
    out
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn create_user(&self, user: NewUser) -> Result<UserRow, AppError> {
        let row = UserRow {
            id: Uuid::new_v4(),
            linkedin_url: user.linkedin_url,
            username: user.username,
            name: user.name,
            headline: user.headline,
            about: user.about,
            profile_data: Json(user.profile_data),
            voice_profile: Json(user.voice_profile),
            created_at: Utc::now(),
        };
        self.tables.write().await.users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>, AppError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<UserRow>, AppError> {
        Ok(sorted_by_creation(&self.tables.read().await.users, |u| u.created_at))
    }

    async fn create_target(&self, target: NewTarget) -> Result<TargetRow, AppError> {
        let row = TargetRow {
            id: Uuid::new_v4(),
            user_id: target.user_id,
            linkedin_url: target.linkedin_url,
            name: target.name,
            headline: target.headline,
            about: target.about,
            insights: Json(target.insights),
            created_at: Utc::now(),
        };
        self.tables.write().await.targets.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_target(&self, id: Uuid) -> Result<Option<TargetRow>, AppError> {
        Ok(self.tables.read().await.targets.get(&id).cloned())
    }

    async fn list_targets(&self) -> Result<Vec<TargetRow>, AppError> {
        Ok(sorted_by_creation(&self.tables.read().await.targets, |t| t.created_at))
    }

    async fn create_posts(&self, posts: Vec<NewPost>) -> Result<Vec<PostRow>, AppError> {
        let now = Utc::now();
        let rows: Vec<PostRow> = posts
            .into_iter()
            .map(|p| PostRow {
                id: Uuid::new_v4(),
                target_id: p.target_id,
                source_post_id: p.source_post_id,
                post_url: p.post_url,
                content: p.content,
                posted_at: p.posted_at,
                likes_count: p.likes_count,
                comments_count: p.comments_count,
                created_at: now,
            })
            .collect();

        let mut tables = self.tables.write().await;
        for row in &rows {
            tables.posts.insert(row.id, row.clone());
        }
        Ok(rows)
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<PostRow>, AppError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn list_posts(&self) -> Result<Vec<PostRow>, AppError> {
        Ok(sorted_by_creation(&self.tables.read().await.posts, |p| p.created_at))
    }

    async fn create_comments(&self, comments: Vec<NewComment>) -> Result<Vec<CommentRow>, AppError> {
        let now = Utc::now();
        let rows: Vec<CommentRow> = comments
            .into_iter()
            .map(|c| CommentRow {
                id: Uuid::new_v4(),
                user_id: c.user_id,
                post_id: c.post_id,
                text: c.text,
                variation: c.variation,
                confidence: c.confidence,
                approach: c.approach,
                quality_score: c.quality_score,
                created_at: now,
            })
            .collect();

        let mut tables = self.tables.write().await;
        for row in &rows {
            tables.comments.insert(row.id, row.clone());
        }
        Ok(rows)
    }

    async fn comments_for_user(&self, user_id: Uuid) -> Result<Vec<CommentRow>, AppError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<CommentRow> = tables
            .comments
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|c| (Reverse(c.created_at), c.variation));
        Ok(rows)
    }

    async fn stats(&self) -> Result<StoreStats, AppError> {
        let tables = self.tables.read().await;
        Ok(StoreStats {
            total_users: tables.users.len() as i64,
            total_targets: tables.targets.len() as i64,
            total_posts: tables.posts.len() as i64,
            total_generated_comments: tables.comments.len() as i64,
        })
    }
}
