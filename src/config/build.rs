//! `[build]` section configuration.
//!
//! Contains content discovery, output, pagination and build-policy settings.

use super::defaults;
use educe::Educe;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Policy applied when two documents resolve to the same slug.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlugCollision {
    /// Fail the build with a route collision error.
    #[default]
    Error,
    /// Disambiguate with `-2`, `-3`, ... suffixes in load order.
    Suffix,
}

/// `[build]` section in papyr.toml.
///
/// # Example
/// ```toml
/// [build]
/// content = "content"
/// output = "public"
/// page_size = 10
/// ignore_files = ['\.Rmd$', '_cache/']
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root (set from CLI, not from papyr.toml).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Content directory path (relative to project root).
    #[serde(default = "defaults::build::content")]
    #[educe(Default = defaults::build::content())]
    pub content: PathBuf,

    /// Output directory path (relative to project root).
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Theme name selecting the layout set.
    #[serde(default = "defaults::build::theme")]
    #[educe(Default = defaults::build::theme())]
    pub theme: String,

    /// Regex patterns excluded from content discovery.
    /// Matched against the path relative to the content directory.
    #[serde(default)]
    pub ignore_files: Vec<String>,

    /// Include draft documents in published output.
    #[serde(default)]
    pub drafts: bool,

    /// Treat any per-document error as build-fatal.
    #[serde(default)]
    pub strict: bool,

    /// Items per list page; the last page may be partial.
    #[serde(default = "defaults::build::page_size")]
    #[educe(Default = defaults::build::page_size())]
    pub page_size: usize,

    /// Slug collision policy.
    #[serde(default = "defaults::build::slug_collision")]
    #[educe(Default = defaults::build::slug_collision())]
    pub slug_collision: SlugCollision,

    /// Minify HTML and XML output.
    #[serde(default)]
    pub minify: bool,

    /// Build deadline in seconds.
    #[serde(default = "defaults::build::timeout")]
    #[educe(Default = defaults::build::timeout())]
    pub timeout: u64,
}

impl BuildConfig {
    /// Compile `ignore_files` patterns, failing on the first invalid regex.
    pub fn ignore_patterns(&self) -> Result<Vec<Regex>, regex::Error> {
        self.ignore_files.iter().map(|p| Regex::new(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use super::*;

    #[test]
    fn test_build_config_defaults() {
        let config = r#"
            [base]
            title = "Test"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.build.content, PathBuf::from("content"));
        assert_eq!(config.build.output, PathBuf::from("public"));
        assert_eq!(config.build.theme, "paper");
        assert_eq!(config.build.page_size, 10);
        assert_eq!(config.build.timeout, 120);
        assert_eq!(config.build.slug_collision, SlugCollision::Error);
        assert!(!config.build.drafts);
        assert!(!config.build.strict);
        assert!(!config.build.minify);
        assert!(config.build.ignore_files.is_empty());
    }

    #[test]
    fn test_build_config_full() {
        let config = r#"
            [base]
            title = "Test"

            [build]
            content = "posts"
            output = "dist"
            page_size = 5
            drafts = true
            strict = true
            minify = true
            slug_collision = "suffix"
            ignore_files = ['\.Rmd$', '_cache/']
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.build.content, PathBuf::from("posts"));
        assert_eq!(config.build.output, PathBuf::from("dist"));
        assert_eq!(config.build.page_size, 5);
        assert_eq!(config.build.slug_collision, SlugCollision::Suffix);
        assert!(config.build.drafts);
        assert!(config.build.strict);
        assert!(config.build.minify);
        assert_eq!(config.build.ignore_files.len(), 2);
    }

    #[test]
    fn test_ignore_patterns_compile() {
        let config = r#"
            [base]
            title = "Test"

            [build]
            ignore_files = ['\.Rmd$', '^drafts/']
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();
        let patterns = config.build.ignore_patterns().unwrap();

        assert_eq!(patterns.len(), 2);
        assert!(patterns[0].is_match("analysis.Rmd"));
        assert!(!patterns[0].is_match("analysis.md"));
        assert!(patterns[1].is_match("drafts/wip.md"));
    }

    #[test]
    fn test_ignore_patterns_invalid() {
        let config = r#"
            [base]
            title = "Test"

            [build]
            ignore_files = ['[unclosed']
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();
        assert!(config.build.ignore_patterns().is_err());
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [base]
            title = "Test"

            [build]
            unknown_field = true
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);
        assert!(result.is_err());
    }
}
