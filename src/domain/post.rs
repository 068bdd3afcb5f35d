use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::tag::TagRecord;

/// A post row as returned by the store.
///
/// `author` comes from a left join on users and is only `None` when the
/// referenced user row is missing. The counts are `Some` only when the
/// query that produced the row annotated them.
#[derive(Debug, Clone)]
pub struct PostRecord {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub image: Option<String>,
    pub published_at: OffsetDateTime,
    pub author: Option<String>,
    pub likes_count: Option<i64>,
    pub comments_count: Option<i64>,
}

/// A post together with its prefetched tags.
#[derive(Debug, Clone)]
pub struct PostWithTags {
    pub post: PostRecord,
    pub tags: Vec<TagRecord>,
}
