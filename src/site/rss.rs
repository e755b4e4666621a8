//! rss feed generation.
//!
//! Builds the `/index.xml` channel from the published page set.

use crate::{config::SiteConfig, render::RenderedPage};
use anyhow::{Result, anyhow};
use regex::Regex;
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder, validation::Validate};
use std::sync::LazyLock;

/// Generate the rss xml string for the given pages (newest first).
///
/// Pages without a publish date are silently skipped; a feed entry without
/// a date is not useful to readers.
pub fn rss_feed(pages: &[&RenderedPage], config: &SiteConfig) -> Result<String> {
    let items: Vec<_> = pages
        .iter()
        .filter_map(|page| page_to_rss_item(page, config))
        .collect();

    let channel = ChannelBuilder::default()
        .title(&config.base.title)
        .link(config.base.url.as_deref().unwrap_or_default())
        .description(&config.base.description)
        .language(config.base.language.clone())
        .generator("papyr".to_string())
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| anyhow!("rss validation failed: {e}"))?;
    Ok(channel.to_string())
}

/// Convert a rendered page to an rss item.
/// Returns None if the page has no date.
fn page_to_rss_item(page: &RenderedPage, config: &SiteConfig) -> Option<rss::Item> {
    let date = page.date?;
    let link = format!("{}{}", config.base.url_trimmed(), page.url);
    let author = normalize_rss_author(page.author.as_ref(), config);

    Some(
        ItemBuilder::default()
            .title(page.title.clone())
            .link(Some(link.clone()))
            .guid(GuidBuilder::default().permalink(true).value(link).build())
            .description(page.summary.clone())
            .pub_date(date.to_rfc2822())
            .author(author)
            .build(),
    )
}

/// Normalize author field to rss format: "email@example.com (Name)"
///
/// Priority:
/// 1. Page author if already in valid format
/// 2. Site config author if in valid format
/// 3. Combine site config email and author
fn normalize_rss_author(author: Option<&String>, config: &SiteConfig) -> Option<String> {
    static RE_VALID_AUTHOR: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}[ \t]*\([^)]+\)$").unwrap()
    });

    let author = author?;

    if RE_VALID_AUTHOR.is_match(author) {
        return Some(author.clone());
    }

    let site_author = &config.base.author;
    if RE_VALID_AUTHOR.is_match(site_author) {
        return Some(site_author.clone());
    }

    Some(format!("{} ({})", config.base.email, site_author))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn make_config(author: &str, email: &str) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.base.title = "Blog".to_string();
        config.base.description = "A blog".to_string();
        config.base.author = author.to_string();
        config.base.email = email.to_string();
        config.base.url = Some("https://example.com".to_string());
        config
    }

    fn make_page(slug: &str, dated: bool) -> RenderedPage {
        RenderedPage {
            path: PathBuf::from(format!("content/{slug}.md")),
            slug: slug.to_string(),
            url: format!("/{slug}/"),
            title: format!("Title {slug}"),
            author: None,
            date: dated.then(|| Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()),
            summary: Some("Summary".to_string()),
            categories: vec![],
            tags: vec![],
            html: String::new(),
            reading_time: 1,
            draft: false,
        }
    }

    #[test]
    fn test_rss_feed_channel_fields() {
        let config = make_config("Alice", "alice@example.com");
        let p = make_page("a", true);
        let xml = rss_feed(&[&p], &config).unwrap();

        assert!(xml.contains("<title>Blog</title>"));
        assert!(xml.contains("<link>https://example.com</link>"));
        assert!(xml.contains("<generator>papyr</generator>"));
        assert!(xml.contains("https://example.com/a/"));
    }

    #[test]
    fn test_rss_feed_skips_dateless() {
        let config = make_config("Alice", "alice@example.com");
        let dated = make_page("dated", true);
        let dateless = make_page("dateless", false);
        let xml = rss_feed(&[&dated, &dateless], &config).unwrap();

        assert!(xml.contains("/dated/"));
        assert!(!xml.contains("/dateless/"));
    }

    #[test]
    fn test_page_to_rss_item_fields() {
        let config = make_config("Alice", "alice@example.com");
        let mut page = make_page("a", true);
        page.author = Some("author@example.com (Author)".to_string());

        let item = page_to_rss_item(&page, &config).expect("should convert");
        assert_eq!(item.title(), Some("Title a"));
        assert_eq!(item.link(), Some("https://example.com/a/"));
        assert_eq!(item.description(), Some("Summary"));
        assert_eq!(item.author(), Some("author@example.com (Author)"));
        assert!(item.pub_date().unwrap().contains("Jan 2024"));
    }

    #[test]
    fn test_page_to_rss_item_missing_date() {
        let config = make_config("Alice", "alice@example.com");
        assert!(page_to_rss_item(&make_page("a", false), &config).is_none());
    }

    #[test]
    fn test_normalize_rss_author() {
        let config = make_config("Site Author", "site@example.com");

        // Case 1: Page author is already valid
        let valid = "post@example.com (Post Author)".to_string();
        assert_eq!(
            normalize_rss_author(Some(&valid), &config),
            Some(valid.clone())
        );

        // Case 2: Page author invalid (just a name), combined fallback
        let name_only = "Post Author".to_string();
        assert_eq!(
            normalize_rss_author(Some(&name_only), &config),
            Some("site@example.com (Site Author)".to_string())
        );

        // Case 3: No page author
        assert_eq!(normalize_rss_author(None, &config), None);

        // Case 4: Site author already in valid format
        let config_valid = make_config("site@example.com (Site Author)", "");
        assert_eq!(
            normalize_rss_author(Some(&name_only), &config_valid),
            Some("site@example.com (Site Author)".to_string())
        );
    }
}
