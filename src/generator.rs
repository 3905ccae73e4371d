use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::{bail, Context as _};
use log::{debug, error, info, warn};
use regex::{NoExpand, Regex};

use crate::{
    context::Context,
    index::save_index,
    metadata::{sort_post, PostMetadata},
    renderer::{OG_IMAGE_HEIGHT, OG_IMAGE_WIDTH, OG_TAGS, POST_SCRIPT},
};

use data::{EmbeddedPost, OgTagsData, PostScriptData};
use frontmatter::parse_frontmatter;
use utils::{absolute_url, clean_excerpt, create_post_id, title_from_file_stem};

mod data;
mod frontmatter;
mod utils;

const MARKDOWN_EXTENSION: &str = "md";
const HEAD_CLOSE: &str = "</head>";

static OG_BLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)[ \t]*<!-- Open Graph / Social Media Meta Tags -->.*?<meta property="og:image:height"[^>]+/>"#,
    )
    .unwrap()
});

/// Result of [`convert_all`]: the converted posts, newest first, and the
/// files that had to be skipped.
#[derive(Debug, Default)]
pub(crate) struct BatchSummary {
    pub posts: Vec<PostMetadata>,
    pub skipped: Vec<PathBuf>,
}

/// Reads one markdown post, writes its page into `blogs_dir` and returns its
/// index entry. A page that cannot be generated is logged, not an error.
pub(crate) fn convert_file(ctx: &Context, file_path: &Path) -> anyhow::Result<PostMetadata> {
    if !file_path.is_file() {
        bail!("File {file_path:?} does not exist");
    }
    let raw = std::fs::read_to_string(file_path)
        .with_context(|| format!("while reading {file_path:?}"))?;
    let (mut frontmatter, body) = parse_frontmatter(&raw);
    let body = body.trim();

    let title = frontmatter.remove("title").unwrap_or_else(|| {
        let stem = file_path.file_stem().unwrap_or_default().to_string_lossy();
        title_from_file_stem(&stem)
    });
    let date = frontmatter
        .remove("date")
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
    let excerpt = match frontmatter.remove("excerpt") {
        Some(excerpt) => excerpt,
        None if ctx.auto_excerpt => clean_excerpt(body, ctx.excerpt_length),
        None => String::new(),
    };
    let thumbnail = frontmatter.remove("thumbnail").unwrap_or_default();

    let post = PostMetadata {
        id: create_post_id(&title, &date),
        title,
        date,
        excerpt,
        thumbnail,
        ..Default::default()
    };

    if generate_html(ctx, &post, body, &ctx.blogs_dir).is_some() {
        info!(
            "Converted: {} -> {}.html",
            file_path.file_name().unwrap_or_default().to_string_lossy(),
            post.id
        );
    }

    Ok(post)
}

/// Writes `<output_dir>/<id>.html` from the page template in `output_dir`.
/// Returns `None`, without writing anything, when the template or its
/// Open Graph block is missing or any step fails.
pub(crate) fn generate_html(
    ctx: &Context,
    post: &PostMetadata,
    body: &str,
    output_dir: &Path,
) -> Option<PathBuf> {
    match try_generate_html(ctx, post, body, output_dir) {
        Ok(path) => path,
        Err(e) => {
            error!("Error generating HTML file: {e:#}");
            None
        }
    }
}

fn try_generate_html(
    ctx: &Context,
    post: &PostMetadata,
    body: &str,
    output_dir: &Path,
) -> anyhow::Result<Option<PathBuf>> {
    let template_path = ctx.template_path(output_dir);
    if !template_path.exists() {
        warn!("{template_path:?} not found. Skipping HTML generation.");
        return Ok(None);
    }
    let template = std::fs::read_to_string(&template_path)
        .with_context(|| format!("while reading {template_path:?}"))?;

    if !OG_BLOCK_PATTERN.is_match(&template) {
        warn!("Could not find OG tags section in {template_path:?}");
        return Ok(None);
    }

    let thumbnail = match post.thumbnail.as_str() {
        "" => ctx.default_thumbnail.as_str(),
        thumbnail => thumbnail,
    };
    let og_tags = ctx
        .handlebars
        .render(
            OG_TAGS,
            &OgTagsData {
                title: &post.title,
                description: &post.excerpt,
                url: ctx.post_url(&post.id),
                image: absolute_url(&ctx.site_url, thumbnail),
                image_width: OG_IMAGE_WIDTH,
                image_height: OG_IMAGE_HEIGHT,
            },
        )
        .context("while rendering og tags")?;

    let page = OG_BLOCK_PATTERN.replace(&template, NoExpand(&og_tags));

    let data = serde_json::to_string(&EmbeddedPost {
        title: &post.title,
        date: &post.date,
        content: body,
    })?
    .replace("</", "<\\/");
    let script = ctx
        .handlebars
        .render(
            POST_SCRIPT,
            &PostScriptData {
                id: serde_json::to_string(&post.id)?,
                data,
            },
        )
        .context("while rendering post script")?;

    let page = match page.find(HEAD_CLOSE) {
        Some(i) => format!("{}{}{}", &page[..i], script, &page[i..]),
        None => {
            warn!("No {HEAD_CLOSE} in {template_path:?}; the post data is not embedded");
            page.into_owned()
        }
    };

    let html_path = output_dir.join(format!("{}.html", post.id));
    std::fs::write(&html_path, page).with_context(|| format!("while writing {html_path:?}"))?;
    info!("Generated HTML: {html_path:?}");

    Ok(Some(html_path))
}

/// Converts every `*.md` directly inside `posts_dir` and rewrites the whole
/// index from the results. Unlike [`crate::index::update_index`], entries of
/// the previous index are not kept.
pub(crate) fn convert_all(ctx: &Context, posts_dir: &Path) -> anyhow::Result<BatchSummary> {
    if !posts_dir.is_dir() {
        bail!("Directory {posts_dir:?} does not exist");
    }

    let mut markdown_files = vec![];
    for entry in std::fs::read_dir(posts_dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file()
            && path.extension().is_some_and(|ext| ext == MARKDOWN_EXTENSION)
        {
            markdown_files.push(path);
        }
    }
    markdown_files.sort();

    let mut summary = BatchSummary::default();
    if markdown_files.is_empty() {
        info!("No markdown files found in {posts_dir:?}");
        return Ok(summary);
    }
    info!("Found {} markdown files to convert...", markdown_files.len());

    for file_path in markdown_files {
        match convert_file(ctx, &file_path) {
            Ok(post) => {
                debug!("{file_path:?} -> {}", post.id);
                summary.posts.push(post);
            }
            Err(e) => {
                warn!("Skipped {file_path:?} due to conversion error: {e:#}");
                summary.skipped.push(file_path);
            }
        }
    }

    if summary.posts.is_empty() {
        error!("No files were successfully converted");
        return Ok(summary);
    }

    summary.posts.sort_by(sort_post);
    let index_path = ctx.index_path();
    match save_index(&index_path, &summary.posts) {
        Ok(()) => {
            info!("Successfully converted {} posts", summary.posts.len());
            info!(
                "Created blogs index {index_path:?} with {} entries",
                summary.posts.len()
            );
        }
        Err(e) => error!("Error creating index file: {e:#}"),
    }

    Ok(summary)
}
