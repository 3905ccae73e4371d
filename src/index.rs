use std::{
    borrow::Cow,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::LazyLock,
};

use anyhow::Context;
use log::{error, info, warn};
use regex::Regex;

use crate::metadata::{sort_post, PostMetadata};

// A plain `2024-01-15` value in a record's top-level key. YAML 1.1 readers
// take these for timestamps, so they are written single-quoted.
static PLAIN_TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^((?:- |  )[^\s'\x22#][^:\n]*: )(\d{4}-\d{1,2}-\d{1,2}(?:[Tt ][^'\n]*)?)$")
        .unwrap()
});

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum IndexChange {
    Updated,
    Added,
}

pub(crate) fn load_index(index_path: &Path) -> anyhow::Result<Vec<PostMetadata>> {
    if !index_path.exists() {
        info!("Index file({index_path:?}) does not exist. starting a new one...");
        return Ok(vec![]);
    }
    let content = std::fs::read_to_string(index_path)
        .with_context(|| format!("while reading {index_path:?}"))?;
    if content.trim().is_empty() {
        return Ok(vec![]);
    }
    let posts: Option<Vec<PostMetadata>> = serde_yaml::from_str(&content)
        .with_context(|| format!("while parsing {index_path:?}"))?;

    Ok(posts.unwrap_or_default())
}

/// Writes `posts` as they are; callers sort first.
pub(crate) fn save_index(index_path: &Path, posts: &[PostMetadata]) -> anyhow::Result<()> {
    if let Some(parent) = index_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_extra::dir::create_all(parent, false)
            .with_context(|| format!("while creating {parent:?}"))?;
    }
    let fd = File::create(index_path).with_context(|| format!("while creating {index_path:?}"))?;
    let yaml = serde_yaml::to_string(posts)
        .with_context(|| format!("while serializing {index_path:?}"))?;
    let mut writer = BufWriter::new(fd);
    writer
        .write_all(quote_timestamps(&yaml).as_bytes())
        .with_context(|| format!("while writing {index_path:?}"))?;
    writer.flush()?;

    Ok(())
}

fn quote_timestamps(yaml: &str) -> Cow<'_, str> {
    PLAIN_TIMESTAMP_RE.replace_all(yaml, "$1'$2'")
}

/// Replaces the entry sharing `post.id`, or appends when there is none.
pub(crate) fn merge_post(posts: &mut Vec<PostMetadata>, post: PostMetadata) -> IndexChange {
    match posts.iter_mut().find(|p| p.id == post.id) {
        Some(existing) => {
            *existing = post;
            IndexChange::Updated
        }
        None => {
            posts.push(post);
            IndexChange::Added
        }
    }
}

/// Merges one post into the index at `index_path`. Never fails: an unreadable
/// index is replaced and a failed write is only logged.
pub(crate) fn update_index(index_path: &Path, post: PostMetadata) {
    let mut posts = load_index(index_path).unwrap_or_else(|e| {
        warn!("Error reading existing index file: {e:#}");
        vec![]
    });

    let title = post.title.clone();
    match merge_post(&mut posts, post) {
        IndexChange::Updated => info!("Updated existing blog: {title}"),
        IndexChange::Added => info!("Added new blog: {title}"),
    }
    posts.sort_by(sort_post);

    match save_index(index_path, &posts) {
        Ok(()) => info!("Updated index file: {index_path:?}"),
        Err(e) => error!("Error updating index file: {e:#}"),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn post(id: &str, title: &str, date: &str) -> PostMetadata {
        PostMetadata {
            id: id.to_string(),
            title: title.to_string(),
            date: date.to_string(),
            excerpt: String::new(),
            thumbnail: String::new(),
            ..Default::default()
        }
    }

    #[test]
    fn test_update_replaces_matching_id() {
        let dir = tempdir().unwrap();
        let index_path = dir.path().join("blogs.yaml");
        save_index(
            &index_path,
            &[post("b-2024", "B", "2024-02-01"), post("a-2023", "A", "2023-01-01")],
        )
        .unwrap();

        update_index(&index_path, post("a-2023", "A revised", "2023-01-01"));

        let posts = load_index(&index_path).unwrap();
        assert_eq!(posts.len(), 2);
        let matching: Vec<_> = posts.iter().filter(|p| p.id == "a-2023").collect();
        assert_eq!(matching, [&post("a-2023", "A revised", "2023-01-01")]);
    }

    #[test]
    fn test_update_appends_new_id_and_sorts() {
        let dir = tempdir().unwrap();
        let index_path = dir.path().join("blogs.yaml");
        save_index(
            &index_path,
            &[post("b-2024", "B", "2024-02-01"), post("a-2023", "A", "2023-01-01")],
        )
        .unwrap();

        update_index(&index_path, post("c-2023", "C", "2023-06-15"));

        let posts = load_index(&index_path).unwrap();
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["b-2024", "c-2023", "a-2023"]);
    }

    #[test]
    fn test_update_keeps_unknown_keys_of_other_posts() {
        let dir = tempdir().unwrap();
        let index_path = dir.path().join("blogs.yaml");
        std::fs::write(
            &index_path,
            concat!(
                "- id: a-2023\n",
                "  title: A\n",
                "  date: '2023-01-01'\n",
                "  tags:\n",
                "  - rust\n",
                "  featured: true\n",
            ),
        )
        .unwrap();

        update_index(&index_path, post("b-2024", "B", "2024-02-01"));

        let posts = load_index(&index_path).unwrap();
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["b-2024", "a-2023"]);
        let extra = &posts[1].extra;
        assert_eq!(extra.len(), 2);
        assert_eq!(extra["featured"], serde_yaml::Value::Bool(true));
        assert_eq!(extra["tags"][0].as_str(), Some("rust"));
        assert!(posts[0].extra.is_empty());
    }

    #[test]
    fn test_dates_are_written_quoted() {
        let dir = tempdir().unwrap();
        let index_path = dir.path().join("blogs.yaml");
        let mut first = post("a-2024", "A", "2024-01-15");
        first.excerpt = "Line one\ndate: 2020-01-01\n".to_string();
        let posts = [first, post("b-2023", "B", "2023-1-5")];

        save_index(&index_path, &posts).unwrap();

        let written = std::fs::read_to_string(&index_path).unwrap();
        assert!(written.contains("  date: '2024-01-15'\n"));
        assert!(written.contains("  date: '2023-1-5'\n"));
        assert!(!written.contains("'2020-01-01'"));
        assert_eq!(load_index(&index_path).unwrap(), posts);
    }

    #[test]
    fn test_quote_timestamps_leaves_other_scalars() {
        let yaml = "- id: x-2024\n  date: 2024-01-15\n  title: '2024-01-15'\n  note: 2024\n";
        assert_eq!(
            quote_timestamps(yaml),
            "- id: x-2024\n  date: '2024-01-15'\n  title: '2024-01-15'\n  note: 2024\n"
        );
        assert_eq!(quote_timestamps("- date: 2024-01-15\n"), "- date: '2024-01-15'\n");
    }

    #[test]
    fn test_update_creates_missing_parent_dirs() {
        let dir = tempdir().unwrap();
        let index_path = dir.path().join("nested/deeper/blogs.yaml");

        update_index(&index_path, post("x-2024", "X", "2024-05-05"));

        assert_eq!(load_index(&index_path).unwrap(), [post("x-2024", "X", "2024-05-05")]);
    }

    #[test]
    fn test_unreadable_index_is_treated_as_empty() {
        let dir = tempdir().unwrap();
        let index_path = dir.path().join("blogs.yaml");
        std::fs::write(&index_path, "title: [not, a, list\n").unwrap();
        assert!(load_index(&index_path).is_err());

        update_index(&index_path, post("x-2024", "X", "2024-05-05"));

        assert_eq!(load_index(&index_path).unwrap(), [post("x-2024", "X", "2024-05-05")]);
    }

    #[test]
    fn test_empty_index_file() {
        let dir = tempdir().unwrap();
        let index_path = dir.path().join("blogs.yaml");
        std::fs::write(&index_path, "\n").unwrap();
        assert!(load_index(&index_path).unwrap().is_empty());
    }

    #[test]
    fn test_unicode_is_written_verbatim() {
        let dir = tempdir().unwrap();
        let index_path = dir.path().join("blogs.yaml");
        save_index(&index_path, &[post("caf-2024", "Café 日記", "2024-01-01")]).unwrap();

        let written = std::fs::read_to_string(&index_path).unwrap();
        assert!(written.contains("Café 日記"));
        assert!(written.starts_with("- id: caf-2024\n"));
    }

    #[test]
    fn test_merge_post_reports_change() {
        let mut posts = vec![post("a", "A", "2024-01-01")];
        assert_eq!(merge_post(&mut posts, post("a", "A2", "2024-01-01")), IndexChange::Updated);
        assert_eq!(merge_post(&mut posts, post("b", "B", "2024-01-02")), IndexChange::Added);
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "A2");
    }
}
