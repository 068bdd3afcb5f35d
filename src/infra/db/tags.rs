use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::app::repos::{RepoError, TagsRepo};
use crate::domain::tag::{PostTag, TagRecord};

use super::Db;

#[async_trait]
impl TagsRepo for Db {
    async fn list_popular(&self, limit: i64) -> Result<Vec<TagRecord>, RepoError> {
        let rows = sqlx::query(
            "SELECT t.id, t.title, COUNT(pt.post_id) AS posts_count \
             FROM tags t \
             LEFT JOIN post_tags pt ON pt.tag_id = t.id \
             GROUP BY t.id, t.title \
             ORDER BY posts_count DESC, t.title \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        let mut tags = Vec::with_capacity(rows.len());
        for row in rows {
            tags.push(TagRecord {
                id: row.try_get("id")?,
                title: row.try_get("title")?,
                posts_count: Some(row.try_get("posts_count")?),
            });
        }

        Ok(tags)
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<TagRecord>, RepoError> {
        let row = sqlx::query("SELECT id, title FROM tags WHERE title = $1")
            .bind(title)
            .fetch_optional(self.pool())
            .await?;

        let tag = match row {
            Some(row) => Some(TagRecord {
                id: row.try_get("id")?,
                title: row.try_get("title")?,
                posts_count: None,
            }),
            None => None,
        };

        Ok(tag)
    }

    async fn list_for_posts(&self, post_ids: &[Uuid]) -> Result<Vec<PostTag>, RepoError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            "SELECT pt.post_id, t.id, t.title \
             FROM post_tags pt \
             JOIN tags t ON t.id = pt.tag_id \
             WHERE pt.post_id = ANY($1) \
             ORDER BY t.title",
        )
        .bind(post_ids)
        .fetch_all(self.pool())
        .await?;

        let mut links = Vec::with_capacity(rows.len());
        for row in rows {
            links.push(PostTag {
                post_id: row.try_get("post_id")?,
                tag: TagRecord {
                    id: row.try_get("id")?,
                    title: row.try_get("title")?,
                    posts_count: None,
                },
            });
        }

        Ok(links)
    }
}
