use askama::Template;
use axum::response::Html;

use crate::app::pages::{IndexContext, PostDetailContext, TagFilterContext};
use crate::http::AppError;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: IndexContext,
}

#[derive(Template)]
#[template(path = "post_details.html")]
pub struct PostDetailTemplate {
    pub view: PostDetailContext,
}

#[derive(Template)]
#[template(path = "posts_list.html")]
pub struct PostsListTemplate {
    pub view: TagFilterContext,
}

#[derive(Template)]
#[template(path = "contacts.html")]
pub struct ContactsTemplate;

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub status: u16,
    pub title: &'a str,
    pub message: &'a str,
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, AppError> {
    template.render().map(Html).map_err(|err| {
        tracing::error!(error = ?err, "failed to render template");
        AppError::internal("failed to render page")
    })
}
