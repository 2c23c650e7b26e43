//! Sidebar navigation built from a directory of Markdown files.

use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;

static NUMERIC_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[-_.\s]?\s*").expect("valid prefix regex"));
static WORD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w").expect("valid word regex"));
static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(?:[-_.\s]|$)").expect("valid number regex"));

const PAGE_EXTENSIONS: [&str; 2] = ["md", "mdx"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    pub title: String,
    /// Link path: the URL prefix followed by the entry names without their
    /// extension.
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
    /// Whether the item opens a page. Directories are pages only when they
    /// hold an index file.
    pub is_page: bool,
}

/// "01-getting-started.md" -> "Getting Started".
pub fn clean_name(name: &str, is_file: bool) -> String {
    let mut cleaned = NUMERIC_PREFIX.replace(name, "").into_owned();
    if is_file {
        cleaned = strip_page_extension(&cleaned).to_string();
    }
    let spaced = cleaned.replace('-', " ");
    WORD_START
        .replace_all(&spaced, |caps: &regex::Captures<'_>| caps[0].to_uppercase())
        .into_owned()
}

fn strip_page_extension(name: &str) -> &str {
    PAGE_EXTENSIONS
        .iter()
        .find_map(|ext| name.strip_suffix(ext)?.strip_suffix('.'))
        .unwrap_or(name)
}

fn is_page_file(name: &str) -> bool {
    strip_page_extension(name) != name
}

fn leading_number(name: &str) -> Option<u64> {
    LEADING_NUMBER
        .captures(name)
        .and_then(|caps| caps[1].parse().ok())
}

/// Numbered entries first in numeric order, then the rest by name.
fn compare_entries(a: &str, b: &str) -> Ordering {
    match (leading_number(a), leading_number(b)) {
        (Some(x), Some(y)) if x != y => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => a.cmp(b),
    }
}

/// The `title:` field of a leading front-matter block, if any.
pub fn front_matter_title(text: &str) -> Option<String> {
    let mut lines = text.lines();
    if lines.next()?.trim() != "---" {
        return None;
    }
    lines
        .take_while(|line| line.trim() != "---")
        .find_map(|line| line.strip_prefix("title:"))
        .map(|value| value.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
        .filter(|title| !title.is_empty())
}

fn title_from_file(path: &Path, fallback: String) -> String {
    fs::read_to_string(path)
        .ok()
        .and_then(|text| front_matter_title(&text))
        .unwrap_or(fallback)
}

fn index_file(dir: &Path) -> Option<std::path::PathBuf> {
    PAGE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("index.{ext}")))
        .find(|path| path.is_file())
}

/// Build the navigation tree for everything under `root`.
///
/// A missing root yields an empty tree.
///
/// # Errors
/// Returns an error if a directory exists but cannot be listed.
pub fn build_nav(root: &Path, url_prefix: &str) -> Result<Vec<NavItem>> {
    let _scope = crate::perf::scope("nav.build");
    if !root.exists() {
        tracing::warn!(root = %root.display(), "docs root not found");
        return Ok(Vec::new());
    }
    walk(root, url_prefix.trim_end_matches('/'))
}

fn walk(dir: &Path, prefix: &str) -> Result<Vec<NavItem>> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("failed to list {}", dir.display()))?
        .filter_map(std::result::Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            (!name.starts_with('.')).then_some((name, entry.path()))
        })
        .collect::<Vec<_>>();
    entries.sort_by(|(a, _), (b, _)| compare_entries(a, b));

    let mut items = Vec::new();
    for (name, path) in entries {
        let link = format!("{prefix}/{}", strip_page_extension(&name));
        if path.is_dir() {
            let children = walk(&path, &link)?;
            let index = index_file(&path);
            let title = match &index {
                Some(index) => title_from_file(index, clean_name(&name, false)),
                None => clean_name(&name, false),
            };
            if index.is_some() || !children.is_empty() {
                items.push(NavItem {
                    title,
                    path: link,
                    children,
                    is_page: index.is_some(),
                });
            }
        } else if is_page_file(&name) {
            if strip_page_extension(&name).eq_ignore_ascii_case("index") {
                continue;
            }
            items.push(NavItem {
                title: title_from_file(&path, clean_name(&name, true)),
                path: link,
                children: Vec::new(),
                is_page: true,
            });
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("01-getting-started.md", true), "Getting Started");
        assert_eq!(clean_name("2_advanced", false), "Advanced");
        assert_eq!(clean_name("faq.mdx", true), "Faq");
        assert_eq!(clean_name("notes.md", false), "Notes.Md");
    }

    #[test]
    fn test_sort_puts_numbers_first() {
        let mut names = vec!["b.md", "10-z.md", "a.md", "2-y.md"];
        names.sort_by(|a, b| compare_entries(a, b));
        assert_eq!(names, vec!["2-y.md", "10-z.md", "a.md", "b.md"]);
    }

    #[test]
    fn test_front_matter_title() {
        assert_eq!(
            front_matter_title("---\ntitle: \"Intro\"\norder: 1\n---\n# Body"),
            Some("Intro".to_string())
        );
        assert_eq!(front_matter_title("# No front matter\ntitle: x"), None);
        assert_eq!(front_matter_title("---\nauthor: me\n---\ntitle: late"), None);
    }

    #[test]
    fn test_build_nav_tree() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("01-guide")).unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::create_dir_all(root.join(".hidden")).unwrap();
        fs::write(root.join(".hidden/secret.md"), "x").unwrap();
        fs::write(root.join("01-guide/index.md"), "---\ntitle: The Guide\n---\n").unwrap();
        fs::write(root.join("01-guide/02-install.md"), "# Install").unwrap();
        fs::write(root.join("01-guide/01-intro.md"), "# Intro").unwrap();
        fs::write(root.join("changelog.md"), "---\ntitle: Changes\n---\n").unwrap();
        fs::write(root.join("image.png"), "png").unwrap();

        let nav = build_nav(root, "/docs/1.0/").unwrap();

        assert_eq!(nav.len(), 2);
        let guide = &nav[0];
        assert_eq!(guide.title, "The Guide");
        assert_eq!(guide.path, "/docs/1.0/01-guide");
        assert!(guide.is_page);
        let titles: Vec<&str> = guide.children.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Intro", "Install"]);
        assert_eq!(guide.children[1].path, "/docs/1.0/01-guide/02-install");

        assert_eq!(nav[1].title, "Changes");
        assert!(nav[1].children.is_empty());
    }

    #[test]
    fn test_directory_without_index_is_a_section() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("api")).unwrap();
        fs::write(dir.path().join("api/auth.md"), "").unwrap();
        let nav = build_nav(dir.path(), "").unwrap();
        assert_eq!(nav[0].title, "Api");
        assert!(!nav[0].is_page);
        assert_eq!(nav[0].children[0].path, "/api/auth");
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = tempdir().unwrap();
        assert!(build_nav(&dir.path().join("missing"), "/docs").unwrap().is_empty());
    }
}
