//! Build error taxonomy.
//!
//! Per-document errors (`Load`, `Schema`, `Render`) are collected during a
//! build and reported together; they only fail the build in strict mode.
//! `RouteCollision`, `Timeout` and `Cancelled` are always fatal.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while building a site.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A content file could not be read or its front-matter block is malformed.
    #[error("load error in `{path}`: {message}")]
    Load { path: PathBuf, message: String },

    /// Front-matter parsed but a required field is missing.
    #[error("schema error in `{path}`: missing required field `{field}`")]
    Schema { path: PathBuf, field: &'static str },

    /// The markup body of a document is malformed.
    #[error("render error in `{path}`: {message}")]
    Render { path: PathBuf, message: String },

    /// Two documents map to the same URL.
    #[error("route collision: `{url}` produced by both `{first}` and `{second}`")]
    RouteCollision {
        url: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// A route could not be written to the output tree.
    #[error("write error for route `{url}`")]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// The build exceeded its configured deadline.
    #[error("build timed out after {0} seconds")]
    Timeout(u64),

    /// The build was cancelled before completion.
    #[error("build cancelled")]
    Cancelled,
}

impl BuildError {
    pub fn load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn render(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Render {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this error aborts the build even outside strict mode.
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::RouteCollision { .. } | Self::Timeout(_) | Self::Cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_load_error_display() {
        let err = BuildError::load("content/post.md", "unterminated front-matter");
        let display = format!("{err}");
        assert!(display.contains("content/post.md"));
        assert!(display.contains("unterminated front-matter"));
    }

    #[test]
    fn test_schema_error_display() {
        let err = BuildError::Schema {
            path: Path::new("content/untitled.md").into(),
            field: "title",
        };
        assert!(format!("{err}").contains("missing required field `title`"));
    }

    #[test]
    fn test_fatal_classification() {
        assert!(BuildError::Cancelled.is_fatal());
        assert!(BuildError::Timeout(120).is_fatal());
        assert!(
            BuildError::RouteCollision {
                url: "/a/".into(),
                first: "a.md".into(),
                second: "b.md".into(),
            }
            .is_fatal()
        );
        assert!(!BuildError::load("a.md", "oops").is_fatal());
        assert!(
            !BuildError::Render {
                path: "a.md".into(),
                message: "bad fence".into()
            }
            .is_fatal()
        );
    }
}
