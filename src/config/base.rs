//! `[base]` section configuration.
//!
//! Site-wide metadata: title, author, base URL, language.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in papyr.toml.
///
/// # Example
/// ```toml
/// [base]
/// title = "My Blog"
/// description = "A personal blog about data analysis"
/// author = "Alice"
/// url = "https://myblog.com"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Shown in the browser tab and the nav logo.
    pub title: String,

    /// Fallback author for feed entries.
    #[serde(default = "defaults::base::author")]
    #[educe(Default = defaults::base::author())]
    pub author: String,

    /// Paired with `author` to form the rss author field.
    #[serde(default = "defaults::base::email")]
    #[educe(Default = defaults::base::email())]
    pub email: String,

    /// Used in meta description tags and feed channels.
    #[serde(default)]
    pub description: String,

    /// Absolute base for links in feeds.
    /// Required when `rss` or `json` appears in `[outputs] home`.
    #[serde(default = "defaults::base::url")]
    #[educe(Default = defaults::base::url())]
    pub url: Option<String>,

    /// BCP 47 language code (e.g., "en-US", "zh-Hans").
    #[serde(default = "defaults::base::language")]
    #[educe(Default = defaults::base::language())]
    pub language: String,

    /// Shown in the page footer when non-empty.
    #[serde(default)]
    pub copyright: String,
}

impl BaseConfig {
    /// Base URL without a trailing slash, empty if unset.
    pub fn url_trimmed(&self) -> &str {
        self.url.as_deref().unwrap_or_default().trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;

    #[test]
    fn test_base_config_full() {
        let config = r#"
            [base]
            title = "Field Notes"
            description = "Analysis write-ups"
            url = "https://example.org"
            language = "en-US"
            copyright = "2025 Alice"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.base.title, "Field Notes");
        assert_eq!(config.base.description, "Analysis write-ups");
        assert_eq!(config.base.url, Some("https://example.org".to_string()));
        assert_eq!(config.base.language, "en-US");
        assert_eq!(config.base.copyright, "2025 Alice");
    }

    #[test]
    fn test_base_config_defaults() {
        let config = r#"
            [base]
            title = "Test"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.base.author, "<YOUR_NAME>");
        assert_eq!(config.base.email, "user@noreply.papyr");
        assert_eq!(config.base.language, "en-US");
        assert_eq!(config.base.url, None);
        assert_eq!(config.base.description, "");
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [base]
            title = "Test"
            unknown_field = "should_fail"
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);

        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn test_url_trimmed() {
        let config = r#"
            [base]
            title = "Test"
            url = "https://example.org/"
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();
        assert_eq!(config.base.url_trimmed(), "https://example.org");

        let config: SiteConfig = toml::from_str("[base]\ntitle = \"T\"").unwrap();
        assert_eq!(config.base.url_trimmed(), "");
    }
}
