use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use crate::app::repos::{PostsRepo, RepoError};
use crate::domain::comment::CommentRecord;
use crate::domain::post::PostRecord;

use super::Db;

const POST_COLUMNS: &str = "p.id, p.title, p.text, p.slug, p.image, p.published_at, \
                            u.username AS author";

/// Which aggregate column, if any, the query selected.
#[derive(Clone, Copy)]
enum Annotation {
    None,
    Likes,
    Comments,
}

fn post_from_row(row: &PgRow, annotation: Annotation) -> Result<PostRecord, RepoError> {
    let (likes_count, comments_count) = match annotation {
        Annotation::None => (None, None),
        Annotation::Likes => (Some(row.try_get("likes_count")?), None),
        Annotation::Comments => (None, Some(row.try_get("comments_count")?)),
    };

    Ok(PostRecord {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        text: row.try_get("text")?,
        slug: row.try_get("slug")?,
        image: row.try_get("image")?,
        published_at: row.try_get("published_at")?,
        author: row.try_get("author")?,
        likes_count,
        comments_count,
    })
}

fn posts_from_rows(rows: &[PgRow], annotation: Annotation) -> Result<Vec<PostRecord>, RepoError> {
    rows.iter()
        .map(|row| post_from_row(row, annotation))
        .collect()
}

#[async_trait]
impl PostsRepo for Db {
    async fn list_popular(&self, limit: i64) -> Result<Vec<PostRecord>, RepoError> {
        let rows = sqlx::query(&format!(
            "SELECT {POST_COLUMNS}, \
                    (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id) AS likes_count \
             FROM posts p \
             LEFT JOIN users u ON u.id = p.author_id \
             ORDER BY likes_count DESC, p.published_at DESC, p.slug \
             LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        posts_from_rows(&rows, Annotation::Likes)
    }

    async fn list_fresh(&self, limit: i64) -> Result<Vec<PostRecord>, RepoError> {
        let rows = sqlx::query(&format!(
            "SELECT {POST_COLUMNS}, \
                    (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments_count \
             FROM posts p \
             LEFT JOIN users u ON u.id = p.author_id \
             ORDER BY p.published_at DESC, p.slug \
             LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        posts_from_rows(&rows, Annotation::Comments)
    }

    async fn list_for_tag(&self, tag_id: Uuid, limit: i64) -> Result<Vec<PostRecord>, RepoError> {
        let rows = sqlx::query(&format!(
            "SELECT {POST_COLUMNS}, \
                    (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments_count \
             FROM posts p \
             JOIN post_tags pt ON pt.post_id = p.id \
             LEFT JOIN users u ON u.id = p.author_id \
             WHERE pt.tag_id = $1 \
             ORDER BY p.published_at DESC, p.slug \
             LIMIT $2"
        ))
        .bind(tag_id)
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        posts_from_rows(&rows, Annotation::Comments)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let row = sqlx::query(&format!(
            "SELECT {POST_COLUMNS} \
             FROM posts p \
             LEFT JOIN users u ON u.id = p.author_id \
             WHERE p.slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool())
        .await?;

        row.map(|row| post_from_row(&row, Annotation::None))
            .transpose()
    }

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentRecord>, RepoError> {
        let rows = sqlx::query(
            "SELECT c.id, c.post_id, c.text, c.published_at, u.username AS author \
             FROM comments c \
             LEFT JOIN users u ON u.id = c.author_id \
             WHERE c.post_id = $1 \
             ORDER BY c.published_at, c.id",
        )
        .bind(post_id)
        .fetch_all(self.pool())
        .await?;

        let mut comments = Vec::with_capacity(rows.len());
        for row in rows {
            comments.push(CommentRecord {
                id: row.try_get("id")?,
                post_id: row.try_get("post_id")?,
                text: row.try_get("text")?,
                published_at: row.try_get("published_at")?,
                author: row.try_get("author")?,
            });
        }

        Ok(comments)
    }

    async fn count_likes(&self, post_id: Uuid) -> Result<i64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM post_likes WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    async fn ping(&self) -> Result<(), RepoError> {
        sqlx::query("SELECT 1").execute(self.pool()).await?;
        Ok(())
    }
}
