//! Flattens store records into page-ready views.
//!
//! None of these functions touch the store: every aggregate they emit was
//! either attached by the producing query or is defaulted here.

use serde::Serialize;
use thiserror::Error;
use time::macros::format_description;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::comment::CommentRecord;
use crate::domain::post::{PostRecord, PostWithTags};
use crate::domain::tag::TagRecord;
use crate::infra::storage::MediaStorage;

pub const TEASER_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("post `{slug}` has no author")]
    MissingAuthor { slug: String },
    #[error("comment {comment_id} has no author")]
    MissingCommentAuthor { comment_id: Uuid },
    #[error("cannot build image url for post `{slug}`: {source}")]
    ImageUrl {
        slug: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TagView {
    pub title: String,
    pub posts_with_tag: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub title: String,
    pub author: String,
    pub image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub published_at: OffsetDateTime,
    pub slug: String,
    pub first_tag_title: Option<String>,
    pub teaser_text: String,
    pub comments_amount: i64,
    pub tags: Vec<TagView>,
}

impl PostView {
    pub fn published_label(&self) -> String {
        published_label(self.published_at)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub published_at: OffsetDateTime,
    pub author: String,
}

impl CommentView {
    pub fn published_label(&self) -> String {
        published_label(self.published_at)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetailView {
    #[serde(flatten)]
    pub summary: PostView,
    pub text: String,
    pub comments: Vec<CommentView>,
    pub likes_amount: i64,
}

pub fn serialize_tag(tag: &TagRecord) -> TagView {
    TagView {
        title: tag.title.clone(),
        posts_with_tag: tag.posts_count.unwrap_or(0),
    }
}

pub fn serialize_post(entry: &PostWithTags, media: &MediaStorage) -> Result<PostView, SerializeError> {
    let post = &entry.post;
    let author = post
        .author
        .clone()
        .ok_or_else(|| SerializeError::MissingAuthor {
            slug: post.slug.clone(),
        })?;
    let tags: Vec<TagView> = entry.tags.iter().map(serialize_tag).collect();

    Ok(PostView {
        title: post.title.clone(),
        author,
        image_url: image_url(post, media)?,
        published_at: post.published_at,
        slug: post.slug.clone(),
        first_tag_title: tags.first().map(|tag| tag.title.clone()),
        teaser_text: teaser(&post.text),
        comments_amount: post.comments_count.unwrap_or(0),
        tags,
    })
}

/// `likes_amount` is taken as given; callers pass a fresh count over the
/// full like relation rather than a query annotation.
pub fn serialize_post_detail(
    entry: &PostWithTags,
    comments: &[CommentRecord],
    likes_amount: i64,
    media: &MediaStorage,
) -> Result<PostDetailView, SerializeError> {
    let mut summary = serialize_post(entry, media)?;
    summary.comments_amount = comments.len() as i64;

    let comments = comments
        .iter()
        .map(serialize_comment)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PostDetailView {
        summary,
        text: entry.post.text.clone(),
        comments,
        likes_amount,
    })
}

pub fn serialize_comment(comment: &CommentRecord) -> Result<CommentView, SerializeError> {
    let author = comment
        .author
        .clone()
        .ok_or(SerializeError::MissingCommentAuthor {
            comment_id: comment.id,
        })?;

    Ok(CommentView {
        text: comment.text.clone(),
        published_at: comment.published_at,
        author,
    })
}

pub fn teaser(text: &str) -> String {
    match text.char_indices().nth(TEASER_CHARS) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}

fn image_url(post: &PostRecord, media: &MediaStorage) -> Result<Option<String>, SerializeError> {
    let Some(key) = post.image.as_deref().filter(|key| !key.is_empty()) else {
        return Ok(None);
    };
    let url = media
        .url_for(key)
        .map_err(|source| SerializeError::ImageUrl {
            slug: post.slug.clone(),
            source,
        })?;
    Ok(Some(url.to_string()))
}

fn published_label(at: OffsetDateTime) -> String {
    at.format(format_description!(
        "[day padding:none] [month repr:long] [year], [hour]:[minute]"
    ))
    .unwrap_or_else(|_| at.date().to_string())
}
