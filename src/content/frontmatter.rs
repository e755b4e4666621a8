//! Front-matter parsing for content files.
//!
//! Supports YAML blocks delimited by `---` and TOML blocks delimited by
//! `+++`. The block is optional, but `title` must be present somewhere for
//! the document to be usable (enforced by the loader).

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

/// Raw front-matter fields as written by the author.
///
/// Everything is optional at this layer; the loader decides which missing
/// fields are schema errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrontMatter {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub author: Option<String>,

    /// Publish date as written: `2024-01-31` or RFC 3339.
    #[serde(default)]
    pub date: Option<String>,

    /// Slug override; slugified before use.
    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub draft: bool,
}

/// Delimiter types for front-matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML front-matter delimited by `---`.
    Yaml,
    /// TOML front-matter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    const fn delimiter(self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split content into front-matter and body.
///
/// Returns `Ok(None)` when the file has no front-matter block at all, and an
/// error when an opening delimiter is never closed.
pub fn split_frontmatter(
    content: &str,
) -> Result<Option<(FrontmatterFormat, &str, &str)>, String> {
    let trimmed = content.trim_start();

    let format = if trimmed.starts_with("---") {
        FrontmatterFormat::Yaml
    } else if trimmed.starts_with("+++") {
        FrontmatterFormat::Toml
    } else {
        return Ok(None);
    };

    let delimiter = format.delimiter();
    let after_first = &trimmed[delimiter.len()..];
    let Some(closing_pos) = after_first.find(&format!("\n{delimiter}")) else {
        return Err(format!("unterminated `{delimiter}` front-matter block"));
    };

    let frontmatter = after_first[..closing_pos].trim();
    let body = after_first[closing_pos + 1 + delimiter.len()..].trim_start();

    Ok(Some((format, frontmatter, body)))
}

/// Parse front-matter from file content, returning metadata and body.
///
/// Content without a front-matter block yields a default (empty) record.
pub fn parse_frontmatter(content: &str) -> Result<(FrontMatter, String), String> {
    let Some((format, fm_str, body)) = split_frontmatter(content)? else {
        return Ok((FrontMatter::default(), content.to_string()));
    };

    let frontmatter: FrontMatter = match format {
        FrontmatterFormat::Yaml => serde_yaml::from_str(fm_str).map_err(|e| e.to_string())?,
        FrontmatterFormat::Toml => {
            // TOML has a native datetime type; normalize it to a string so
            // the shared `date` field accepts both quoted and bare dates.
            let mut value: toml::Value = toml::from_str(fm_str).map_err(|e| e.to_string())?;
            if let Some(table) = value.as_table_mut()
                && let Some(date) = table.get_mut("date")
                && !date.is_str()
            {
                *date = toml::Value::String(date.to_string());
            }
            value.try_into().map_err(|e: toml::de::Error| e.to_string())?
        }
    };

    Ok((frontmatter, body.to_string()))
}

/// Parse a front-matter date: `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS`, or RFC 3339.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&ndt));
    }
    if let Ok(nd) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&nd.and_hms_opt(0, 0, 0)?));
    }
    None
}
