/// Server-side page rendering
use serde::Serialize;
use tera::{Context, Tera};

use crate::error::AppError;
use crate::models::Post;

const INDEX_TEMPLATE: &str = "index.html";

#[derive(Serialize)]
struct PostView<'a> {
    id: i64,
    content: &'a str,
    iso_timestamp: String,
    display_timestamp: String,
}

impl<'a> From<&'a Post> for PostView<'a> {
    fn from(post: &'a Post) -> Self {
        Self {
            id: post.id,
            content: &post.content,
            iso_timestamp: post.timestamp.to_rfc3339(),
            display_timestamp: post.timestamp.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}

/// Templates compiled into the binary; `.html` templates are autoescaped.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template(INDEX_TEMPLATE, include_str!("../templates/index.html"))?;
        Ok(Self { tera })
    }

    pub fn index(&self, posts: &[Post]) -> Result<String, AppError> {
        let views: Vec<PostView<'_>> = posts.iter().map(PostView::from).collect();
        let mut ctx = Context::new();
        ctx.insert("posts", &views);
        self.tera
            .render(INDEX_TEMPLATE, &ctx)
            .map_err(|e| AppError::Render(e.to_string()))
    }
}
