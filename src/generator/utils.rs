use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

static NON_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9\s]").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#{1,6}[ \t]+").unwrap());
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap());

pub(crate) const ELLIPSIS: &str = "...";

/// Builds `<slug>-<year>`, e.g. `("My Great Post", "2024-01-15")` gives
/// `my-great-post-2024`.
pub(crate) fn create_post_id(title: &str, date: &str) -> String {
    let lowered = title.to_lowercase();
    let cleaned = NON_SLUG_RE.replace_all(&lowered, "");
    let slug = WHITESPACE_RE.replace_all(cleaned.trim(), "-");
    let slug = slug.trim_matches('-');

    let year = match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.year().to_string(),
        Err(_) => match date.split_once('-') {
            Some((year, _)) => year.to_string(),
            None => date.to_string(),
        },
    };

    format!("{slug}-{year}")
}

/// Plain-text summary of a markdown body: markup removed, first paragraph
/// only, cut at a word boundary and suffixed with [`ELLIPSIS`] when longer
/// than `max_length` characters.
pub(crate) fn clean_excerpt(content: &str, max_length: usize) -> String {
    let text = TAG_RE.replace_all(content, "");
    let text = BOLD_RE.replace_all(&text, "$1");
    let text = ITALIC_RE.replace_all(&text, "$1");
    let text = HEADING_RE.replace_all(&text, "");
    let text = LINK_RE.replace_all(&text, "$1");

    let first_paragraph = text.split("\n\n").next().unwrap_or("").trim();
    if first_paragraph.chars().count() <= max_length {
        return first_paragraph.to_string();
    }

    let cut = first_paragraph
        .char_indices()
        .nth(max_length)
        .map_or(first_paragraph.len(), |(i, _)| i);
    let (head, rest) = first_paragraph.split_at(cut);
    let on_boundary = rest.starts_with(char::is_whitespace);
    let truncated = match head.rfind(char::is_whitespace) {
        Some(i) if !on_boundary => &head[..i],
        _ => head,
    };

    format!("{}{ELLIPSIS}", truncated.trim_end())
}

/// `my-first-post` becomes `My First Post`.
pub(crate) fn title_from_file_stem(stem: &str) -> String {
    let mut title = String::with_capacity(stem.len());
    let mut in_word = false;
    for c in stem.chars() {
        let c = if c == '-' { ' ' } else { c };
        if c.is_alphabetic() {
            if in_word {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            title.push(c);
            in_word = false;
        }
    }
    title
}

pub(crate) fn absolute_url(site_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        site_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
