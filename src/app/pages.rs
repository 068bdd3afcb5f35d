use anyhow::Result;
use serde::Serialize;

use crate::app::content::ContentService;
use crate::app::serialize::{
    serialize_post, serialize_post_detail, serialize_tag, PostDetailView, PostView, TagView,
};
use crate::domain::post::PostWithTags;
use crate::domain::tag::TagRecord;
use crate::infra::storage::MediaStorage;

pub const SIDEBAR_POSTS: i64 = 5;
pub const SIDEBAR_TAGS: i64 = 5;
pub const INDEX_FRESH_POSTS: i64 = 5;
pub const TAG_PAGE_POSTS: i64 = 20;

#[derive(Debug, Clone, Serialize)]
pub struct IndexContext {
    pub most_popular_posts: Vec<PostView>,
    pub page_posts: Vec<PostView>,
    pub popular_tags: Vec<TagView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetailContext {
    pub post: PostDetailView,
    pub popular_tags: Vec<TagView>,
    pub most_popular_posts: Vec<PostView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagFilterContext {
    pub tag: String,
    pub posts: Vec<PostView>,
    pub popular_tags: Vec<TagView>,
    pub most_popular_posts: Vec<PostView>,
}

/// Builds the context for each public page. `None` means the requested
/// post or tag does not exist.
#[derive(Clone)]
pub struct PageService {
    content: ContentService,
    media: MediaStorage,
}

impl PageService {
    pub fn new(content: ContentService, media: MediaStorage) -> Self {
        Self { content, media }
    }

    pub async fn index(&self) -> Result<IndexContext> {
        let most_popular_posts = self.content.popular_posts(SIDEBAR_POSTS).await?;
        let fresh_posts = self.content.fresh_posts(INDEX_FRESH_POSTS).await?;
        let popular_tags = self.content.popular_tags(SIDEBAR_TAGS).await?;

        Ok(IndexContext {
            most_popular_posts: self.post_views(&most_popular_posts)?,
            page_posts: self.post_views(&fresh_posts)?,
            popular_tags: tag_views(&popular_tags),
        })
    }

    pub async fn post_detail(&self, slug: &str) -> Result<Option<PostDetailContext>> {
        let Some(post) = self.content.find_post(slug).await? else {
            return Ok(None);
        };

        let comments = self.content.post_comments(post.post.id).await?;
        let likes = self.content.count_likes(post.post.id).await?;
        let popular_tags = self.content.popular_tags(SIDEBAR_TAGS).await?;
        let most_popular_posts = self.content.popular_posts(SIDEBAR_POSTS).await?;

        Ok(Some(PostDetailContext {
            post: serialize_post_detail(&post, &comments, likes, &self.media)?,
            popular_tags: tag_views(&popular_tags),
            most_popular_posts: self.post_views(&most_popular_posts)?,
        }))
    }

    pub async fn tag_filter(&self, tag_title: &str) -> Result<Option<TagFilterContext>> {
        let Some(tag) = self.content.find_tag(tag_title).await? else {
            return Ok(None);
        };

        let popular_tags = self.content.popular_tags(SIDEBAR_TAGS).await?;
        let most_popular_posts = self.content.popular_posts(SIDEBAR_POSTS).await?;
        let related_posts = self.content.posts_for_tag(&tag, TAG_PAGE_POSTS).await?;

        Ok(Some(TagFilterContext {
            tag: tag.title,
            posts: self.post_views(&related_posts)?,
            popular_tags: tag_views(&popular_tags),
            most_popular_posts: self.post_views(&most_popular_posts)?,
        }))
    }

    fn post_views(&self, posts: &[PostWithTags]) -> Result<Vec<PostView>> {
        let views = posts
            .iter()
            .map(|post| serialize_post(post, &self.media))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(views)
    }
}

fn tag_views(tags: &[TagRecord]) -> Vec<TagView> {
    tags.iter().map(serialize_tag).collect()
}
