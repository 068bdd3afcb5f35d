use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CommentRecord {
    pub id: Uuid,
    pub post_id: Uuid,
    pub text: String,
    pub published_at: OffsetDateTime,
    pub author: Option<String>,
}
