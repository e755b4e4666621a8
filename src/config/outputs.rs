//! `[outputs]` section configuration.
//!
//! Selects which output formats are generated for the site.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// One output format the assembler can produce routes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Html,
    Rss,
    Json,
}

impl OutputFormat {
    /// MIME content type for routes of this format.
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Html => "text/html; charset=utf-8",
            Self::Rss => "application/rss+xml; charset=utf-8",
            Self::Json => "application/feed+json; charset=utf-8",
        }
    }
}

/// `[outputs]` section in papyr.toml.
///
/// # Example
/// ```toml
/// [outputs]
/// home = ["html", "rss", "json"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct OutputsConfig {
    /// Formats generated for the home page. HTML also controls whether
    /// single and list pages are generated at all.
    #[serde(default = "defaults::outputs::home")]
    #[educe(Default = defaults::outputs::home())]
    pub home: Vec<OutputFormat>,
}

impl OutputsConfig {
    pub fn enabled(&self, format: OutputFormat) -> bool {
        self.home.contains(&format)
    }
}
