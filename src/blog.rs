use chrono::NaiveDate;
use pulldown_cmark::{html, Options, Parser};
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

use crate::constants::{BLOG_DATE_FORMAT, BLOG_DATE_PREFIX_LEN, MARKDOWN_EXTENSIONS};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogPost {
    pub title: String,
    pub date: NaiveDate,
    pub html_content: String,
    /// File stem, used as the page anchor and as the tie-breaker when dates match
    pub slug: String,
}

/// Render a markdown fragment to an HTML fragment.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Date encoded in the first ten characters of a file name, e.g. `2024-01-05-launch.md`.
pub fn parse_date_prefix(file_name: &str) -> Option<NaiveDate> {
    let prefix = file_name.get(..BLOG_DATE_PREFIX_LEN)?;
    NaiveDate::parse_from_str(prefix, BLOG_DATE_FORMAT).ok()
}

fn clean_title(line: &str) -> String {
    line.trim_start_matches('\u{feff}')
        .trim()
        .trim_start_matches('#')
        .trim()
        .to_string()
}

/// Build a post from one file. `None` when the file name carries no valid date.
pub fn parse_post(file_name: &str, content: &str) -> Option<BlogPost> {
    let date = parse_date_prefix(file_name)?;

    let mut lines = content.lines();
    let title = lines.next().map(clean_title).unwrap_or_default();
    let body: Vec<&str> = lines.collect();

    let slug = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
        .to_string();

    Some(BlogPost {
        title,
        date,
        html_content: render_markdown(&body.join("\n")),
        slug,
    })
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| MARKDOWN_EXTENSIONS.iter().any(|m| e.eq_ignore_ascii_case(m)))
        .unwrap_or(false)
}

/// Newest first; posts sharing a date are ordered by slug ascending.
pub fn sort_newest_first(posts: &mut [BlogPost]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
}

/// Read every dated markdown file in `dir` into a post list, newest first.
///
/// A missing directory yields no posts. Files without a date prefix, or that
/// cannot be read as UTF-8, are skipped.
pub fn aggregate_posts(dir: &Path) -> Result<Vec<BlogPost>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Blog directory {} does not exist", dir.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut posts = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || !is_markdown(&path) {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping unreadable post {}: {}", path.display(), e);
                continue;
            }
        };

        match parse_post(file_name, &content) {
            Some(post) => posts.push(post),
            None => debug!("Skipping {}: no date prefix", file_name),
        }
    }

    sort_newest_first(&mut posts);
    debug!("Aggregated {} posts from {}", posts.len(), dir.display());
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn parses_title_date_and_body() {
        let post = parse_post("2024-01-05-post.md", "# Hello\nWorld").unwrap();
        assert_eq!(post.title, "Hello");
        assert_eq!(post.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(post.html_content.trim(), "<p>World</p>");
        assert_eq!(post.slug, "2024-01-05-post");
    }

    #[test]
    fn title_markers_and_whitespace_are_stripped() {
        let post = parse_post("2024-02-01.md", "  ###   Week 1 Rankings  \r\nbody").unwrap();
        assert_eq!(post.title, "Week 1 Rankings");
    }

    #[test]
    fn body_is_real_markdown() {
        let html = render_markdown("Some **bold** text\n\n- one\n- two");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<li>one</li>"));
    }

    #[test]
    fn rejects_names_without_date() {
        assert!(parse_post("not-a-date-post.md", "# Nope").is_none());
        assert!(parse_post("2024-13-01-bad-month.md", "# Nope").is_none());
        assert!(parse_post("2024.md", "# Short").is_none());
    }

    #[test]
    fn aggregates_newest_first_and_skips_undated() {
        let dir = tempdir().unwrap();
        write(dir.path(), "2024-01-01-new-year.md", "# New Year\nfirst");
        write(dir.path(), "2024-03-01-spring.md", "# Spring\nsecond");
        write(dir.path(), "2023-12-31-eve.md", "# Eve\nthird");
        write(dir.path(), "not-a-date-post.md", "# Undated\nnope");
        write(dir.path(), "2024-04-01-notes.txt", "# Not markdown");

        let posts = aggregate_posts(dir.path()).unwrap();
        let dates: Vec<String> = posts.iter().map(|p| p.date.to_string()).collect();
        assert_eq!(dates, ["2024-03-01", "2024-01-01", "2023-12-31"]);
        assert!(posts.iter().all(|p| p.title != "Undated"));
    }

    #[test]
    fn same_day_posts_order_by_slug() {
        let dir = tempdir().unwrap();
        write(dir.path(), "2024-05-01-b.md", "# B");
        write(dir.path(), "2024-05-01-a.md", "# A");
        write(dir.path(), "2024-05-02-c.md", "# C");

        let posts = aggregate_posts(dir.path()).unwrap();
        let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["C", "A", "B"]);
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let posts = aggregate_posts(&dir.path().join("nope")).unwrap();
        assert!(posts.is_empty());
    }
}
