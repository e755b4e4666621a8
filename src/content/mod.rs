//! Content discovery and parsing.
//!
//! A content tree of markdown files is turned into an ordered sequence of
//! [`Document`] records:
//!
//! ```text
//! collect_content_files() ──► load_document() ──► Document[]
//!        │                        │
//!        ▼                        ▼
//!   ignore patterns        front-matter + body
//! ```
//!
//! Loading has partial-failure semantics: a malformed document is reported
//! and skipped, never aborting the rest of the pass.

pub mod frontmatter;
pub mod loader;

use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// One piece of authored content: front-matter metadata plus a markdown body.
///
/// Identity is the source path. Documents are immutable once loaded and are
/// recreated wholesale on every build.
#[derive(Debug, Clone)]
pub struct Document {
    /// Source file path (identity).
    pub path: PathBuf,

    /// Required title from front-matter.
    pub title: String,

    /// Optional author override; feeds fall back to the site author.
    pub author: Option<String>,

    /// Publish date. Documents without a date are excluded from feeds.
    pub date: Option<DateTime<Utc>>,

    /// URL slug, unique site-wide after taxonomy indexing.
    pub slug: String,

    /// Short summary for list pages and feeds.
    pub summary: Option<String>,

    /// Category terms, order as written.
    pub categories: Vec<String>,

    /// Tag terms, order as written.
    pub tags: Vec<String>,

    /// Raw markdown body.
    pub body: String,

    /// Draft documents are excluded from published output by default.
    pub draft: bool,
}

impl Document {
    /// Site-relative URL of the single page for this document.
    pub fn url(&self) -> String {
        format!("/{}/", self.slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_url() {
        let doc = Document {
            path: PathBuf::from("content/hello.md"),
            title: "Hello".into(),
            author: None,
            date: None,
            slug: "hello-world".into(),
            summary: None,
            categories: vec![],
            tags: vec![],
            body: String::new(),
            draft: false,
        };
        assert_eq!(doc.url(), "/hello-world/");
    }
}
