//! Persistence for users, targets, posts and generated comments.
//!
//! `AppState` carries an `Arc<dyn Store>`. `main` picks `PgStore` when
//! `DATABASE_URL` is set and `MemoryStore` otherwise.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    CommentRow, NewComment, NewPost, NewTarget, NewUser, PostRow, TargetRow, UserRow,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub total_users: i64,
    pub total_targets: i64,
    pub total_posts: i64,
    pub total_generated_comments: i64,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend label for health output: `memory` or `postgres`.
    fn backend(&self) -> &'static str;

    async fn create_user(&self, user: NewUser) -> Result<UserRow, AppError>;
    async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>, AppError>;
    async fn list_users(&self) -> Result<Vec<UserRow>, AppError>;

    async fn create_target(&self, target: NewTarget) -> Result<TargetRow, AppError>;
    async fn get_target(&self, id: Uuid) -> Result<Option<TargetRow>, AppError>;
    async fn list_targets(&self) -> Result<Vec<TargetRow>, AppError>;

    /// Inserts in order; the returned rows keep that order.
    async fn create_posts(&self, posts: Vec<NewPost>) -> Result<Vec<PostRow>, AppError>;
    async fn get_post(&self, id: Uuid) -> Result<Option<PostRow>, AppError>;
    async fn list_posts(&self) -> Result<Vec<PostRow>, AppError>;

    async fn create_comments(&self, comments: Vec<NewComment>) -> Result<Vec<CommentRow>, AppError>;
    /// Newest first; variations of one run stay in variation order.
    async fn comments_for_user(&self, user_id: Uuid) -> Result<Vec<CommentRow>, AppError>;

    async fn stats(&self) -> Result<StoreStats, AppError>;
}
