//! sqlx-backed store. Schema lives in `migrations/`.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    CommentRow, NewComment, NewPost, NewTarget, NewUser, PostRow, TargetRow, UserRow,
};
use crate::store::{Store, StoreStats};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn create_user(&self, user: NewUser) -> Result<UserRow, AppError> {
        Ok(sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users
                (id, linkedin_url, username, name, headline, about, profile_data, voice_profile)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.linkedin_url)
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.headline)
        .bind(&user.about)
        .bind(Json(&user.profile_data))
        .bind(Json(&user.voice_profile))
        .fetch_one(&self.pool)
        .await?)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>, AppError> {
        Ok(sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_users(&self) -> Result<Vec<UserRow>, AppError> {
        Ok(sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn create_target(&self, target: NewTarget) -> Result<TargetRow, AppError> {
        Ok(sqlx::query_as::<_, TargetRow>(
            r#"
            INSERT INTO targets (id, user_id, linkedin_url, name, headline, about, insights)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(target.user_id)
        .bind(&target.linkedin_url)
        .bind(&target.name)
        .bind(&target.headline)
        .bind(&target.about)
        .bind(Json(&target.insights))
        .fetch_one(&self.pool)
        .await?)
    }

    async fn get_target(&self, id: Uuid) -> Result<Option<TargetRow>, AppError> {
        Ok(sqlx::query_as::<_, TargetRow>("SELECT * FROM targets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_targets(&self) -> Result<Vec<TargetRow>, AppError> {
        Ok(sqlx::query_as::<_, TargetRow>("SELECT * FROM targets ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn create_posts(&self, posts: Vec<NewPost>) -> Result<Vec<PostRow>, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut rows = Vec::with_capacity(posts.len());
        for post in posts {
            let row = sqlx::query_as::<_, PostRow>(
                r#"
                INSERT INTO posts
                    (id, target_id, source_post_id, post_url, content, posted_at,
                     likes_count, comments_count)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(post.target_id)
            .bind(&post.source_post_id)
            .bind(&post.post_url)
            .bind(&post.content)
            .bind(post.posted_at)
            .bind(post.likes_count)
            .bind(post.comments_count)
            .fetch_one(&mut *tx)
            .await?;
            rows.push(row);
        }
        tx.commit().await?;
        Ok(rows)
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<PostRow>, AppError> {
        Ok(sqlx::query_as::<_, PostRow>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_posts(&self) -> Result<Vec<PostRow>, AppError> {
        Ok(sqlx::query_as::<_, PostRow>("SELECT * FROM posts ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn create_comments(&self, comments: Vec<NewComment>) -> Result<Vec<CommentRow>, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut rows = Vec::with_capacity(comments.len());
        for comment in comments {
            let row = sqlx::query_as::<_, CommentRow>(
                r#"
                INSERT INTO generated_comments
                    (id, user_id, post_id, text, variation, confidence, approach, quality_score)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(comment.user_id)
            .bind(comment.post_id)
            .bind(&comment.text)
            .bind(comment.variation)
            .bind(comment.confidence)
            .bind(&comment.approach)
            .bind(comment.quality_score)
            .fetch_one(&mut *tx)
            .await?;
            rows.push(row);
        }
        tx.commit().await?;
        Ok(rows)
    }

    async fn comments_for_user(&self, user_id: Uuid) -> Result<Vec<CommentRow>, AppError> {
        Ok(sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT * FROM generated_comments
            WHERE user_id = $1
            ORDER BY created_at DESC, variation ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn stats(&self) -> Result<StoreStats, AppError> {
        let (total_users, total_targets, total_posts, total_generated_comments): (i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM users),
                    (SELECT COUNT(*) FROM targets),
                    (SELECT COUNT(*) FROM posts),
                    (SELECT COUNT(*) FROM generated_comments)
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(StoreStats {
            total_users,
            total_targets,
            total_posts,
            total_generated_comments,
        })
    }
}
