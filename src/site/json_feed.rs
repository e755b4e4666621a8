//! JSON feed generation (jsonfeed.org version 1.1).
//!
//! Builds the `/index.json` document from the published page set.

use crate::{config::SiteConfig, render::RenderedPage};
use anyhow::Result;
use serde_json::json;

/// Generate the JSON feed string for the given pages (newest first).
pub fn json_feed(pages: &[&RenderedPage], config: &SiteConfig) -> Result<String> {
    let base = config.base.url_trimmed();

    let items: Vec<_> = pages
        .iter()
        .map(|page| {
            let url = format!("{}{}", base, page.url);
            let mut item = json!({
                "id": url,
                "url": url,
                "title": page.title,
                "content_html": page.html,
            });
            if let Some(date) = &page.date {
                item["date_published"] = json!(date.to_rfc3339());
            }
            if let Some(summary) = &page.summary {
                item["summary"] = json!(summary);
            }
            if !page.tags.is_empty() {
                item["tags"] = json!(page.tags);
            }
            if let Some(author) = &page.author {
                item["authors"] = json!([{ "name": author }]);
            }
            item
        })
        .collect();

    let feed = json!({
        "version": "https://jsonfeed.org/version/1.1",
        "title": config.base.title,
        "home_page_url": format!("{base}/"),
        "feed_url": format!("{base}/index.json"),
        "description": config.base.description,
        "language": config.base.language,
        "items": items,
    });

    Ok(serde_json::to_string_pretty(&feed)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn make_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.base.title = "Blog".to_string();
        config.base.url = Some("https://example.com".to_string());
        config
    }

    fn make_page(slug: &str) -> RenderedPage {
        RenderedPage {
            path: PathBuf::from(format!("content/{slug}.md")),
            slug: slug.to_string(),
            url: format!("/{slug}/"),
            title: format!("Title {slug}"),
            author: Some("Alice".to_string()),
            date: Some(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()),
            summary: None,
            categories: vec![],
            tags: vec!["r".to_string()],
            html: "<p>body</p>".to_string(),
            reading_time: 1,
            draft: false,
        }
    }

    #[test]
    fn test_json_feed_structure() {
        let config = make_config();
        let p = make_page("a");
        let feed: serde_json::Value =
            serde_json::from_str(&json_feed(&[&p], &config).unwrap()).unwrap();

        assert_eq!(feed["version"], "https://jsonfeed.org/version/1.1");
        assert_eq!(feed["title"], "Blog");
        assert_eq!(feed["home_page_url"], "https://example.com/");
        assert_eq!(feed["feed_url"], "https://example.com/index.json");

        let items = feed["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], "https://example.com/a/");
        assert_eq!(items[0]["content_html"], "<p>body</p>");
        assert_eq!(items[0]["date_published"], "2024-01-15T00:00:00+00:00");
        assert_eq!(items[0]["tags"][0], "r");
        assert_eq!(items[0]["authors"][0]["name"], "Alice");
    }

    #[test]
    fn test_json_feed_optional_fields_omitted() {
        let config = make_config();
        let mut p = make_page("a");
        p.date = None;
        p.author = None;
        p.tags.clear();

        let feed: serde_json::Value =
            serde_json::from_str(&json_feed(&[&p], &config).unwrap()).unwrap();
        let item = &feed["items"][0];
        assert!(item.get("date_published").is_none());
        assert!(item.get("authors").is_none());
        assert!(item.get("tags").is_none());
    }

    #[test]
    fn test_json_feed_deterministic() {
        let config = make_config();
        let p = make_page("a");
        assert_eq!(
            json_feed(&[&p], &config).unwrap(),
            json_feed(&[&p], &config).unwrap()
        );
    }
}
