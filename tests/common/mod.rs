#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use time::{Duration, OffsetDateTime};
use tower::ServiceExt;
use uuid::Uuid;

use inkwell::app::repos::{PostsRepo, RepoError, TagsRepo};
use inkwell::domain::comment::CommentRecord;
use inkwell::domain::post::PostRecord;
use inkwell::domain::tag::{PostTag, TagRecord};
use inkwell::infra::storage::MediaStorage;
use inkwell::AppState;

pub const MEDIA_BASE_URL: &str = "https://media.test/uploads/";

// ---------------------------------------------------------------------------
// MemoryStore: an in-process stand-in for the Postgres schema
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, String>,
    posts: Vec<StoredPost>,
    tags: Vec<TagRow>,
    post_tags: Vec<(Uuid, Uuid)>,
    likes: HashSet<(Uuid, Uuid)>,
    comments: Vec<StoredComment>,
}

#[derive(Clone)]
struct StoredPost {
    id: Uuid,
    title: String,
    text: String,
    slug: String,
    image: Option<String>,
    published_at: OffsetDateTime,
    author_id: Uuid,
}

#[derive(Clone)]
struct TagRow {
    id: Uuid,
    title: String,
}

#[derive(Clone)]
struct StoredComment {
    id: Uuid,
    post_id: Uuid,
    author_id: Uuid,
    text: String,
    published_at: OffsetDateTime,
}

/// Mirrors the queries in `infra::db` over plain collections, counting
/// every call so tests can assert on store traffic.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn add_user(&self, username: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.tables
            .lock()
            .unwrap()
            .users
            .insert(id, username.to_string());
        id
    }

    pub fn remove_user(&self, id: Uuid) {
        self.tables.lock().unwrap().users.remove(&id);
    }

    pub fn add_post(&self, author_id: Uuid, title: &str, text: &str, age_hours: i64) -> Uuid {
        let id = Uuid::new_v4();
        let slug = title.to_lowercase().replace(' ', "-");
        self.tables.lock().unwrap().posts.push(StoredPost {
            id,
            title: title.to_string(),
            text: text.to_string(),
            slug,
            image: None,
            published_at: base_time() - Duration::hours(age_hours),
            author_id,
        });
        id
    }

    pub fn set_image(&self, post_id: Uuid, key: &str) {
        let mut tables = self.tables.lock().unwrap();
        if let Some(post) = tables.posts.iter_mut().find(|post| post.id == post_id) {
            post.image = Some(key.to_string());
        }
    }

    pub fn add_tag(&self, title: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.lock().unwrap().tags.push(TagRow {
            id,
            title: title.to_string(),
        });
        id
    }

    pub fn tag_post(&self, post_id: Uuid, tag_id: Uuid) {
        self.tables.lock().unwrap().post_tags.push((post_id, tag_id));
    }

    pub fn like(&self, post_id: Uuid, user_id: Uuid) {
        self.tables.lock().unwrap().likes.insert((post_id, user_id));
    }

    pub fn comment(&self, post_id: Uuid, author_id: Uuid, text: &str, age_hours: i64) -> Uuid {
        let id = Uuid::new_v4();
        self.tables.lock().unwrap().comments.push(StoredComment {
            id,
            post_id,
            author_id,
            text: text.to_string(),
            published_at: base_time() - Duration::hours(age_hours),
        });
        id
    }

    pub fn state(&self) -> AppState {
        let media = MediaStorage::from_base_url(MEDIA_BASE_URL).expect("valid media base");
        AppState::new(Arc::new(self.clone()), Arc::new(self.clone()), media)
    }
}

fn base_time() -> OffsetDateTime {
    time::macros::datetime!(2024-03-01 12:00 UTC)
}

impl Tables {
    fn record(&self, post: &StoredPost) -> PostRecord {
        PostRecord {
            id: post.id,
            title: post.title.clone(),
            text: post.text.clone(),
            slug: post.slug.clone(),
            image: post.image.clone(),
            published_at: post.published_at,
            author: self.users.get(&post.author_id).cloned(),
            likes_count: None,
            comments_count: None,
        }
    }

    fn likes_of(&self, post_id: Uuid) -> i64 {
        self.likes.iter().filter(|(post, _)| *post == post_id).count() as i64
    }

    fn comments_of(&self, post_id: Uuid) -> i64 {
        self.comments
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .count() as i64
    }

    fn newest_first(&self, posts: &mut [StoredPost]) {
        posts.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| a.slug.cmp(&b.slug))
        });
    }

    fn with_comment_counts(&self, posts: &[StoredPost], limit: i64) -> Vec<PostRecord> {
        posts
            .iter()
            .take(limit as usize)
            .map(|post| PostRecord {
                comments_count: Some(self.comments_of(post.id)),
                ..self.record(post)
            })
            .collect()
    }
}

#[async_trait]
impl PostsRepo for MemoryStore {
    async fn list_popular(&self, limit: i64) -> Result<Vec<PostRecord>, RepoError> {
        self.record("posts.list_popular");
        let tables = self.tables.lock().unwrap();
        let mut posts = tables.posts.clone();
        tables.newest_first(&mut posts);
        posts.sort_by_key(|post| std::cmp::Reverse(tables.likes_of(post.id)));
        Ok(posts
            .iter()
            .take(limit as usize)
            .map(|post| PostRecord {
                likes_count: Some(tables.likes_of(post.id)),
                ..tables.record(post)
            })
            .collect())
    }

    async fn list_fresh(&self, limit: i64) -> Result<Vec<PostRecord>, RepoError> {
        self.record("posts.list_fresh");
        let tables = self.tables.lock().unwrap();
        let mut posts = tables.posts.clone();
        tables.newest_first(&mut posts);
        Ok(tables.with_comment_counts(&posts, limit))
    }

    async fn list_for_tag(&self, tag_id: Uuid, limit: i64) -> Result<Vec<PostRecord>, RepoError> {
        self.record("posts.list_for_tag");
        let tables = self.tables.lock().unwrap();
        let mut posts: Vec<StoredPost> = tables
            .posts
            .iter()
            .filter(|post| tables.post_tags.contains(&(post.id, tag_id)))
            .cloned()
            .collect();
        tables.newest_first(&mut posts);
        Ok(tables.with_comment_counts(&posts, limit))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        self.record("posts.find_by_slug");
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .posts
            .iter()
            .find(|post| post.slug == slug)
            .map(|post| tables.record(post)))
    }

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentRecord>, RepoError> {
        self.record("posts.list_comments");
        let tables = self.tables.lock().unwrap();
        let mut comments: Vec<&StoredComment> = tables
            .comments
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .collect();
        comments.sort_by_key(|comment| comment.published_at);
        Ok(comments
            .into_iter()
            .map(|comment| CommentRecord {
                id: comment.id,
                post_id: comment.post_id,
                text: comment.text.clone(),
                published_at: comment.published_at,
                author: tables.users.get(&comment.author_id).cloned(),
            })
            .collect())
    }

    async fn count_likes(&self, post_id: Uuid) -> Result<i64, RepoError> {
        self.record("posts.count_likes");
        Ok(self.tables.lock().unwrap().likes_of(post_id))
    }

    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }
}

#[async_trait]
impl TagsRepo for MemoryStore {
    async fn list_popular(&self, limit: i64) -> Result<Vec<TagRecord>, RepoError> {
        self.record("tags.list_popular");
        let tables = self.tables.lock().unwrap();
        let usage = |tag_id: Uuid| {
            tables
                .post_tags
                .iter()
                .filter(|(_, tag)| *tag == tag_id)
                .count() as i64
        };
        let mut tags = tables.tags.clone();
        tags.sort_by(|a, b| {
            usage(b.id)
                .cmp(&usage(a.id))
                .then_with(|| a.title.cmp(&b.title))
        });
        Ok(tags
            .into_iter()
            .take(limit as usize)
            .map(|tag| TagRecord {
                id: tag.id,
                posts_count: Some(usage(tag.id)),
                title: tag.title,
            })
            .collect())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<TagRecord>, RepoError> {
        self.record("tags.find_by_title");
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .tags
            .iter()
            .find(|tag| tag.title == title)
            .map(|tag| TagRecord {
                id: tag.id,
                title: tag.title.clone(),
                posts_count: None,
            }))
    }

    async fn list_for_posts(&self, post_ids: &[Uuid]) -> Result<Vec<PostTag>, RepoError> {
        self.record("tags.list_for_posts");
        let tables = self.tables.lock().unwrap();
        let mut links: Vec<PostTag> = tables
            .post_tags
            .iter()
            .filter(|(post_id, _)| post_ids.contains(post_id))
            .filter_map(|(post_id, tag_id)| {
                tables.tags.iter().find(|tag| tag.id == *tag_id).map(|tag| PostTag {
                    post_id: *post_id,
                    tag: TagRecord {
                        id: tag.id,
                        title: tag.title.clone(),
                        posts_count: None,
                    },
                })
            })
            .collect();
        links.sort_by(|a, b| a.tag.title.cmp(&b.tag.title));
        Ok(links)
    }
}

// ---------------------------------------------------------------------------
// TestApp: drives the router in-process
// ---------------------------------------------------------------------------

pub struct TestApp {
    router: Router,
    pub store: MemoryStore,
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    body_bytes: bytes::Bytes,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body_bytes).into_owned()
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body_bytes).unwrap_or(serde_json::Value::Null)
    }
}

pub fn app() -> TestApp {
    TestApp::new(MemoryStore::new())
}

impl TestApp {
    pub fn new(store: MemoryStore) -> Self {
        let state = store.state();
        let router = inkwell::http::router(state.clone());
        Self {
            router,
            store,
            state,
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .header("host", "localhost")
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot failed");

        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to collect body")
            .to_bytes();

        TestResponse {
            status,
            content_type,
            body_bytes,
        }
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub struct Seeded {
    pub author: Uuid,
    pub readers: Vec<Uuid>,
    pub rust: Uuid,
    pub python: Uuid,
    pub unused: Uuid,
    pub posts: Vec<Uuid>,
}

/// Eight posts, three tags (one unused), varying likes and comments.
/// Post `i` is `i` hours old and has `i % 4` likes.
pub fn seed(store: &MemoryStore) -> Seeded {
    let author = store.add_user("editor");
    let readers: Vec<Uuid> = (0..4).map(|i| store.add_user(&format!("reader{i}"))).collect();
    let rust = store.add_tag("rust");
    let python = store.add_tag("python");
    let unused = store.add_tag("unused");

    let mut posts = Vec::new();
    for i in 0..8i64 {
        let post = store.add_post(author, &format!("Post {i}"), &format!("Body of post {i}"), i);
        for reader in readers.iter().take((i % 4) as usize) {
            store.like(post, *reader);
        }
        if i % 2 == 0 {
            store.tag_post(post, rust);
        }
        if i < 3 {
            store.tag_post(post, python);
        }
        for c in 0..(i % 3) {
            store.comment(post, readers[0], &format!("comment {c} on {i}"), c);
        }
        posts.push(post);
    }

    Seeded {
        author,
        readers,
        rust,
        python,
        unused,
        posts,
    }
}
