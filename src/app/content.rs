use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::app::repos::{PostsRepo, TagsRepo};
use crate::domain::comment::CommentRecord;
use crate::domain::post::{PostRecord, PostWithTags};
use crate::domain::tag::TagRecord;

/// Composes the ordered, annotated views each page is built from.
#[derive(Clone)]
pub struct ContentService {
    posts: Arc<dyn PostsRepo>,
    tags: Arc<dyn TagsRepo>,
}

impl ContentService {
    pub fn new(posts: Arc<dyn PostsRepo>, tags: Arc<dyn TagsRepo>) -> Self {
        Self { posts, tags }
    }

    pub async fn popular_posts(&self, limit: i64) -> Result<Vec<PostWithTags>> {
        let posts = self.posts.list_popular(limit.max(0)).await?;
        self.with_tags(posts).await
    }

    pub async fn fresh_posts(&self, limit: i64) -> Result<Vec<PostWithTags>> {
        let posts = self.posts.list_fresh(limit.max(0)).await?;
        self.with_tags(posts).await
    }

    pub async fn popular_tags(&self, limit: i64) -> Result<Vec<TagRecord>> {
        Ok(self.tags.list_popular(limit.max(0)).await?)
    }

    pub async fn posts_for_tag(&self, tag: &TagRecord, limit: i64) -> Result<Vec<PostWithTags>> {
        let posts = self.posts.list_for_tag(tag.id, limit.max(0)).await?;
        self.with_tags(posts).await
    }

    pub async fn find_post(&self, slug: &str) -> Result<Option<PostWithTags>> {
        let Some(post) = self.posts.find_by_slug(slug).await? else {
            return Ok(None);
        };
        let mut posts = self.with_tags(vec![post]).await?;
        Ok(posts.pop())
    }

    pub async fn find_tag(&self, title: &str) -> Result<Option<TagRecord>> {
        Ok(self.tags.find_by_title(title).await?)
    }

    pub async fn post_comments(&self, post_id: Uuid) -> Result<Vec<CommentRecord>> {
        Ok(self.posts.list_comments(post_id).await?)
    }

    pub async fn count_likes(&self, post_id: Uuid) -> Result<i64> {
        Ok(self.posts.count_likes(post_id).await?)
    }

    pub async fn ping(&self) -> Result<()> {
        Ok(self.posts.ping().await?)
    }

    /// Attaches tags to every post with a single batched lookup.
    async fn with_tags(&self, posts: Vec<PostRecord>) -> Result<Vec<PostWithTags>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = posts.iter().map(|post| post.id).collect();
        let mut by_post: HashMap<Uuid, Vec<TagRecord>> = HashMap::new();
        for link in self.tags.list_for_posts(&ids).await? {
            by_post.entry(link.post_id).or_default().push(link.tag);
        }

        Ok(posts
            .into_iter()
            .map(|post| {
                let tags = by_post.remove(&post.id).unwrap_or_default();
                PostWithTags { post, tags }
            })
            .collect())
    }
}
