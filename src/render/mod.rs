//! Document rendering.
//!
//! Converts one [`Document`] into a [`RenderedPage`]: policy-filtered HTML
//! plus the metadata the assembler and themes need. Rendering is pure; the
//! taxonomy index and `SiteConfig` are read-only inputs, so documents render
//! in parallel without coordination.

pub mod markdown;
pub mod theme;

use crate::{config::SiteConfig, content::Document, error::BuildError};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Words per minute used for the reading-time estimate.
const READING_WPM: usize = 200;

/// One document rendered to HTML, with the metadata list pages and feeds use.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Source path, kept for error reporting.
    pub path: PathBuf,

    /// Unique slug after collision handling.
    pub slug: String,

    /// Site-relative URL (`/slug/`).
    pub url: String,

    pub title: String,
    pub author: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub summary: Option<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,

    /// Rendered body HTML (no layout chrome).
    pub html: String,

    /// Estimated minutes to read, at least 1.
    pub reading_time: usize,

    pub draft: bool,
}

/// Render a single document's body and collect its page metadata.
pub fn render_document(doc: &Document, config: &SiteConfig) -> Result<RenderedPage, BuildError> {
    let html = markdown::render_markdown(&doc.body, config)
        .map_err(|msg| BuildError::render(&doc.path, msg))?;

    Ok(RenderedPage {
        path: doc.path.clone(),
        slug: doc.slug.clone(),
        url: doc.url(),
        title: doc.title.clone(),
        author: doc.author.clone(),
        date: doc.date,
        summary: doc.summary.clone(),
        categories: doc.categories.clone(),
        tags: doc.tags.clone(),
        html,
        reading_time: reading_time(&doc.body),
        draft: doc.draft,
    })
}

/// Estimate reading time in minutes from the raw body.
pub fn reading_time(body: &str) -> usize {
    let words = body.split_whitespace().count();
    words.div_ceil(READING_WPM).max(1)
}

/// Escape `&`, `<`, `>`, `"` for safe interpolation into HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn doc(body: &str) -> Document {
        Document {
            path: Path::new("content/test.md").into(),
            title: "Test".into(),
            author: None,
            date: None,
            slug: "test".into(),
            summary: None,
            categories: vec![],
            tags: vec![],
            body: body.into(),
            draft: false,
        }
    }

    #[test]
    fn test_render_document_basic() {
        let config = SiteConfig::default();
        let page = render_document(&doc("# Hi\n\ntext"), &config).unwrap();
        assert_eq!(page.slug, "test");
        assert_eq!(page.url, "/test/");
        assert!(page.html.contains("<h1>Hi</h1>"));
        assert_eq!(page.reading_time, 1);
    }

    #[test]
    fn test_render_document_determinism() {
        let config = SiteConfig::default();
        let d = doc("# T\n\nSome **bold** text with `code`.\n");
        let a = render_document(&d, &config).unwrap();
        let b = render_document(&d, &config).unwrap();
        assert_eq!(a.html.as_bytes(), b.html.as_bytes());
    }

    #[test]
    fn test_render_document_malformed_fence() {
        let config = SiteConfig::default();
        let err = render_document(&doc("```\nunclosed"), &config).unwrap_err();
        let BuildError::Render { path, .. } = err else {
            panic!("expected render error");
        };
        assert_eq!(path, Path::new("content/test.md"));
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time(""), 1);
        assert_eq!(reading_time("one two three"), 1);
        let long = "word ".repeat(401);
        assert_eq!(reading_time(&long), 3);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
