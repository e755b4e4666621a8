//! Output minification behind `[build] minify`.
//!
//! Routes are shrunk according to their format: HTML through the
//! `minify_html` crate, XML by dropping inter-tag indentation. The JSON
//! feed is left as-is since it is deliberately pretty-printed.

use crate::config::{OutputFormat, SiteConfig};

/// Shrink route bytes for their output format, if minification is enabled.
pub fn minify_route(format: OutputFormat, bytes: Vec<u8>, config: &SiteConfig) -> Vec<u8> {
    if !config.build.minify {
        return bytes;
    }
    match format {
        OutputFormat::Html => shrink_html(&bytes),
        OutputFormat::Rss => shrink_xml(&bytes),
        OutputFormat::Json => bytes,
    }
}

fn shrink_html(html: &[u8]) -> Vec<u8> {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.minify_css = true;
    minify_html::minify(html, &cfg)
}

/// Feed XML carries no whitespace-sensitive content, so trimming every
/// line is safe.
fn shrink_xml(xml: &[u8]) -> Vec<u8> {
    let Ok(text) = std::str::from_utf8(xml) else {
        return xml.to_vec();
    };
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        out.push_str(line.trim());
    }
    out.into_bytes()
}
