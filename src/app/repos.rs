//! Read-only repository traits over the blog's relational store.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::comment::CommentRecord;
use crate::domain::post::PostRecord;
use crate::domain::tag::{PostTag, TagRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Posts ordered by descending like count, annotated with `likes_count`.
    async fn list_popular(&self, limit: i64) -> Result<Vec<PostRecord>, RepoError>;

    /// Posts ordered by descending publish time, annotated with `comments_count`.
    async fn list_fresh(&self, limit: i64) -> Result<Vec<PostRecord>, RepoError>;

    /// Posts carrying `tag_id`, newest first, annotated with `comments_count`.
    async fn list_for_tag(&self, tag_id: Uuid, limit: i64) -> Result<Vec<PostRecord>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError>;

    /// Every comment on the post, oldest first.
    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentRecord>, RepoError>;

    async fn count_likes(&self, post_id: Uuid) -> Result<i64, RepoError>;

    async fn ping(&self) -> Result<(), RepoError>;
}

#[async_trait]
pub trait TagsRepo: Send + Sync {
    /// Tags ordered by descending usage, annotated with `posts_count`.
    async fn list_popular(&self, limit: i64) -> Result<Vec<TagRecord>, RepoError>;

    async fn find_by_title(&self, title: &str) -> Result<Option<TagRecord>, RepoError>;

    /// Tags attached to any of `post_ids`, without usage counts.
    async fn list_for_posts(&self, post_ids: &[Uuid]) -> Result<Vec<PostTag>, RepoError>;
}
