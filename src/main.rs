use clap::{command, Arg, ArgAction, Command};
use context::{
    Context, DEFAULT_BLOGS_DIR, DEFAULT_EXCERPT_LENGTH, DEFAULT_POSTS_DIR, DEFAULT_SITE_URL,
};
use generator::{convert_all, convert_file};
use index::update_index;
use log::info;
use std::path::PathBuf;

mod context;
mod generator;
mod index;
mod metadata;
mod renderer;

const EXAMPLES: &str = "\
Examples:
  # Convert a single post
  convert-blog blogs/posts/my-new-post.md

  # Convert and merge it into blogs.yaml
  convert-blog blogs/posts/my-new-post.md --update-index

  # Convert every markdown file in the posts directory and rebuild blogs.yaml
  convert-blog --convert-all";

fn build_command() -> Command {
    command!()
        .about("Converts markdown blog posts into standalone HTML pages and a YAML index")
        .after_help(EXAMPLES)
        .args(&[
            Arg::new("file")
                .help("Markdown post to convert")
                .value_parser(clap::value_parser!(PathBuf))
                .conflicts_with("convert_all"),
            Arg::new("update_index")
                .short('u')
                .long("update-index")
                .help("Merge the converted post into the blogs index")
                .action(ArgAction::SetTrue),
            Arg::new("convert_all")
                .long("convert-all")
                .help("Convert every markdown file in the posts directory and rebuild the index")
                .action(ArgAction::SetTrue),
            Arg::new("blogs_dir")
                .long("blogs-dir")
                .help("Directory holding the page template, generated pages and the index")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value(DEFAULT_BLOGS_DIR),
            Arg::new("posts_dir")
                .long("posts-dir")
                .help("Directory searched by --convert-all")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value(DEFAULT_POSTS_DIR),
            Arg::new("site_url")
                .long("site-url")
                .help("Base URL of the site [default: $BLOG_SITE_URL or https://fjfehr.github.io]"),
            Arg::new("auto_excerpt")
                .long("auto-excerpt")
                .help("Derive an excerpt from the body when frontmatter has none")
                .action(ArgAction::SetTrue),
            Arg::new("excerpt_length")
                .long("excerpt-length")
                .help("Maximum excerpt length in characters")
                .value_parser(clap::value_parser!(usize))
                .default_value(DEFAULT_EXCERPT_LENGTH.to_string()),
        ])
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut cmd = build_command();

    if std::env::args_os().len() < 2 {
        cmd.print_help()?;
        return Ok(());
    }
    let matches = cmd.get_matches_mut();

    let blogs_dir: &PathBuf = matches.get_one("blogs_dir").unwrap();
    let posts_dir: &PathBuf = matches.get_one("posts_dir").unwrap();
    let site_url = match matches.get_one::<String>("site_url") {
        Some(url) => url.to_owned(),
        None => std::env::var("BLOG_SITE_URL").unwrap_or(DEFAULT_SITE_URL.to_string()),
    };

    let mut ctx = Context::new(blogs_dir.to_owned(), posts_dir.to_owned())?.with_site_url(&site_url);
    ctx.auto_excerpt = matches.get_flag("auto_excerpt");
    ctx.excerpt_length = *matches.get_one::<usize>("excerpt_length").unwrap();

    if matches.get_flag("convert_all") {
        let summary = convert_all(&ctx, &ctx.posts_dir)?;
        if !summary.skipped.is_empty() {
            info!("{} file(s) skipped", summary.skipped.len());
        }
        return Ok(());
    }

    let Some(file) = matches.get_one::<PathBuf>("file") else {
        cmd.print_help()?;
        return Ok(());
    };
    let post = convert_file(&ctx, file)?;
    if matches.get_flag("update_index") {
        update_index(&ctx.index_path(), post);
    }

    println!("\nConversion complete! Your blog is ready for GitHub Pages.");
    println!("\nNext steps:");
    println!("1. git add .");
    println!("2. git commit -m 'Add new blog post'");
    println!("3. git push");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let matches = build_command()
            .try_get_matches_from(["convert-blog", "post.md"])
            .unwrap();
        assert_eq!(
            matches.get_one::<usize>("excerpt_length"),
            Some(&DEFAULT_EXCERPT_LENGTH)
        );
        assert_eq!(
            matches.get_one::<PathBuf>("blogs_dir"),
            Some(&PathBuf::from(DEFAULT_BLOGS_DIR))
        );
        assert!(!matches.get_flag("update_index"));
    }

    #[test]
    fn test_file_conflicts_with_convert_all() {
        assert!(build_command()
            .try_get_matches_from(["convert-blog", "post.md", "--convert-all"])
            .is_err());
        let matches = build_command()
            .try_get_matches_from(["convert-blog", "post.md", "-u", "--excerpt-length", "80"])
            .unwrap();
        assert!(matches.get_flag("update_index"));
        assert_eq!(matches.get_one::<usize>("excerpt_length"), Some(&80));
    }
}
