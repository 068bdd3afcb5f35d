pub mod app;
pub mod config;
pub mod domain;
pub mod http;
pub mod infra;

use std::sync::Arc;

use crate::app::content::ContentService;
use crate::app::pages::PageService;
use crate::app::repos::{PostsRepo, TagsRepo};
use crate::infra::{db::Db, storage::MediaStorage};

#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostsRepo>,
    pub tags: Arc<dyn TagsRepo>,
    pub media: MediaStorage,
}

impl AppState {
    pub fn new(posts: Arc<dyn PostsRepo>, tags: Arc<dyn TagsRepo>, media: MediaStorage) -> Self {
        Self { posts, tags, media }
    }

    /// Both repositories served by one Postgres pool.
    pub fn from_db(db: Db, media: MediaStorage) -> Self {
        let db = Arc::new(db);
        Self::new(db.clone(), db, media)
    }

    pub fn content(&self) -> ContentService {
        ContentService::new(self.posts.clone(), self.tags.clone())
    }

    pub fn pages(&self) -> PageService {
        PageService::new(self.content(), self.media.clone())
    }
}
