use std::path::{Path, PathBuf};

use crate::renderer::generate_renderer;

pub(crate) const DEFAULT_BLOGS_DIR: &str = "blogs";
pub(crate) const DEFAULT_POSTS_DIR: &str = "blogs/posts";
pub(crate) const DEFAULT_SITE_URL: &str = "https://fjfehr.github.io";
pub(crate) const DEFAULT_EXCERPT_LENGTH: usize = 200;

/// Everything the converter needs to know about the site layout. Built once
/// in `main` and handed to every step by reference.
#[derive(Debug)]
pub(crate) struct Context {
    /// Where generated pages, the page template and the index live.
    pub blogs_dir: PathBuf,
    /// Where `--convert-all` looks for markdown sources.
    pub posts_dir: PathBuf,

    pub index_file_name: String,
    pub template_file_name: String,

    /// Base for absolute URLs, without a trailing slash.
    pub site_url: String,
    /// URL path under `site_url` that pages are served from.
    pub blogs_url_path: String,
    /// Used for `og:image` when a post has no thumbnail.
    pub default_thumbnail: String,

    pub excerpt_length: usize,
    /// Derive an excerpt from the body when frontmatter has none.
    pub auto_excerpt: bool,

    pub handlebars: handlebars::Handlebars<'static>,
}

impl Context {
    pub fn new(blogs_dir: PathBuf, posts_dir: PathBuf) -> anyhow::Result<Self> {
        Ok(Self {
            blogs_dir,
            posts_dir,
            index_file_name: "blogs.yaml".to_string(),
            template_file_name: "_blog_template.html".to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            blogs_url_path: "blogs".to_string(),
            default_thumbnail: "content/site/profile_picture.jpg".to_string(),
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
            auto_excerpt: false,
            handlebars: generate_renderer()?,
        })
    }

    pub fn with_site_url(mut self, site_url: &str) -> Self {
        self.site_url = site_url.trim_end_matches('/').to_string();
        self
    }

    pub fn index_path(&self) -> PathBuf {
        self.blogs_dir.join(&self.index_file_name)
    }

    pub fn template_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(&self.template_file_name)
    }

    pub fn post_url(&self, id: &str) -> String {
        format!("{}/{}/{}.html", self.site_url, self.blogs_url_path, id)
    }
}
