use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct TagRecord {
    pub id: Uuid,
    pub title: String,
    /// Number of posts carrying the tag, present on annotated queries only.
    pub posts_count: Option<i64>,
}

/// One row of the post/tag relation, used to prefetch tags for a batch of posts.
#[derive(Debug, Clone)]
pub struct PostTag {
    pub post_id: Uuid,
    pub tag: TagRecord,
}
