//! Content discovery and parallel loading.
//!
//! Walks the content directory, filters ignore patterns, and parses every
//! markdown file into a [`Document`]. Loading is parallel across files;
//! per-document failures are collected, not fatal.

use super::{Document, frontmatter};
use crate::{config::SiteConfig, error::BuildError, utils::slug::slugify};
use rayon::prelude::*;
use regex::Regex;
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Extensions recognized as content documents.
const CONTENT_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Result of one loader pass: usable documents plus collected errors.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Documents in path order.
    pub documents: Vec<Document>,
    /// Per-document errors, in path order.
    pub errors: Vec<BuildError>,
}

/// Load every content document under the configured content directory.
///
/// `on_progress` is invoked once per file, from worker threads.
pub fn load_documents(
    config: &SiteConfig,
    on_progress: impl Fn() + Sync,
) -> anyhow::Result<LoadOutcome> {
    let patterns = config.build.ignore_patterns()?;
    let mut files = collect_content_files(&config.build.content, &patterns);
    files.sort();

    let mut results: Vec<(PathBuf, Result<Document, BuildError>)> = files
        .into_par_iter()
        .map(|path| {
            let result = load_document(&path, config);
            on_progress();
            (path, result)
        })
        .collect();

    // Parallel collection order is nondeterministic; path order keeps
    // downstream slug suffixing and error reporting stable.
    results.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut outcome = LoadOutcome::default();
    for (_, result) in results {
        match result {
            Ok(doc) => outcome.documents.push(doc),
            Err(err) => outcome.errors.push(err),
        }
    }
    Ok(outcome)
}

/// Collect content file paths, applying ignore patterns.
///
/// Patterns match against the path relative to the content directory, with
/// `/` separators. Hidden files and non-markdown extensions are skipped.
pub fn collect_content_files(content_dir: &Path, ignore: &[Regex]) -> Vec<PathBuf> {
    WalkDir::new(content_dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !name.starts_with('.')
        })
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| CONTENT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        })
        .map(walkdir::DirEntry::into_path)
        .filter(|path| {
            let rel = path
                .strip_prefix(content_dir)
                .unwrap_or(path)
                .to_string_lossy()
                .replace('\\', "/");
            !ignore.iter().any(|re| re.is_match(&rel))
        })
        .collect()
}

/// Load and parse a single content file.
pub fn load_document(path: &Path, config: &SiteConfig) -> Result<Document, BuildError> {
    let content = fs::read_to_string(path)
        .map_err(|e| BuildError::load(path, format!("unreadable file: {e}")))?;

    let (fm, body) =
        frontmatter::parse_frontmatter(&content).map_err(|msg| BuildError::load(path, msg))?;

    let Some(title) = fm.title.filter(|t| !t.trim().is_empty()) else {
        return Err(BuildError::Schema {
            path: path.to_path_buf(),
            field: "title",
        });
    };

    let date = match fm.date.as_deref() {
        Some(raw) => Some(
            frontmatter::parse_date(raw)
                .ok_or_else(|| BuildError::load(path, format!("invalid date `{raw}`")))?,
        ),
        None => None,
    };

    let slug = derive_slug(fm.slug.as_deref(), path, &config.build.content);
    if slug.is_empty() {
        return Err(BuildError::load(path, "empty slug after slugification"));
    }

    Ok(Document {
        path: path.to_path_buf(),
        title,
        author: fm.author,
        date,
        slug,
        summary: fm.summary,
        categories: fm.categories,
        tags: fm.tags,
        body,
        draft: fm.draft,
    })
}

/// Slug from front-matter override, or from the file path otherwise.
///
/// Path-derived slugs use the relative path without extension, so
/// `posts/hello-world.md` → `posts-hello-world` never collides with a
/// sibling directory's `hello-world.md` by construction alone.
fn derive_slug(explicit: Option<&str>, path: &Path, content_dir: &Path) -> String {
    if let Some(s) = explicit {
        return slugify(s);
    }
    let rel = path
        .strip_prefix(content_dir)
        .unwrap_or(path)
        .with_extension("");
    slugify(&rel.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(dir: &Path, rel: &str, content: &str) -> PathBuf {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn config_for(dir: &TempDir) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.build.content = dir.path().to_path_buf();
        config
    }

    #[test]
    fn test_collect_filters_extensions_and_hidden() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "a.md", "x");
        write_file(dir.path(), "b.markdown", "x");
        write_file(dir.path(), "c.txt", "x");
        write_file(dir.path(), ".hidden.md", "x");

        let mut files = collect_content_files(dir.path(), &[]);
        files.sort();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.md", "b.markdown"]);
    }

    #[test]
    fn test_collect_applies_ignore_patterns() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "keep.md", "x");
        write_file(dir.path(), "cache/skip.md", "x");

        let ignore = vec![Regex::new("^cache/").unwrap()];
        let files = collect_content_files(dir.path(), &ignore);
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("keep.md"));
    }

    #[test]
    fn test_load_document_full() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        let path = write_file(
            dir.path(),
            "posts/pca.md",
            "---\ntitle: PCA\ndate: 2024-03-01\ntags: [r]\n---\n# Heading\n",
        );

        let doc = load_document(&path, &config).unwrap();
        assert_eq!(doc.title, "PCA");
        assert_eq!(doc.slug, "posts-pca");
        assert_eq!(doc.tags, vec!["r"]);
        assert!(doc.date.is_some());
        assert!(doc.body.starts_with("# Heading"));
    }

    #[test]
    fn test_load_document_slug_override() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        let path = write_file(
            dir.path(),
            "posts/long-name.md",
            "---\ntitle: T\nslug: My Custom Slug\n---\nx",
        );

        let doc = load_document(&path, &config).unwrap();
        assert_eq!(doc.slug, "my-custom-slug");
    }

    #[test]
    fn test_load_document_missing_title_is_schema_error() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        let path = write_file(dir.path(), "untitled.md", "---\ndraft: true\n---\nx");

        let err = load_document(&path, &config).unwrap_err();
        assert!(matches!(err, BuildError::Schema { field: "title", .. }));
    }

    #[test]
    fn test_load_document_bad_date_is_load_error() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        let path = write_file(dir.path(), "bad.md", "---\ntitle: T\ndate: someday\n---\nx");

        let err = load_document(&path, &config).unwrap_err();
        assert!(matches!(err, BuildError::Load { .. }));
    }

    #[test]
    fn test_load_documents_partial_failure() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        write_file(dir.path(), "good.md", "---\ntitle: Good\n---\nx");
        write_file(dir.path(), "bad.md", "---\ntitle: [unclosed\n---\nx");

        let outcome = load_documents(&config, || {}).unwrap();
        assert_eq!(outcome.documents.len(), 1);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.documents[0].title, "Good");
    }

    #[test]
    fn test_load_documents_deterministic_order() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        write_file(dir.path(), "b.md", "---\ntitle: B\n---\nx");
        write_file(dir.path(), "a.md", "---\ntitle: A\n---\nx");
        write_file(dir.path(), "c.md", "---\ntitle: C\n---\nx");

        let outcome = load_documents(&config, || {}).unwrap();
        let titles: Vec<_> = outcome.documents.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_draft_is_loaded() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        write_file(dir.path(), "wip.md", "---\ntitle: WIP\ndraft: true\n---\nx");

        let outcome = load_documents(&config, || {}).unwrap();
        assert_eq!(outcome.documents.len(), 1);
        assert!(outcome.documents[0].draft);
    }
}
