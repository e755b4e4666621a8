//! `[markup]` section configuration.
//!
//! Rendering policy for the markdown-to-HTML conversion.

use serde::{Deserialize, Serialize};

/// `[markup]` section in papyr.toml.
///
/// # Example
/// ```toml
/// [markup]
/// unsafe = true   # let raw HTML blocks through unescaped
/// math = true     # pass $...$ and $$...$$ spans to the client renderer
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkupConfig {
    /// Permit raw HTML embedded in markdown to pass through unescaped.
    /// When false, raw HTML blocks are escaped and shown as text.
    #[serde(default, rename = "unsafe")]
    pub unsafe_html: bool,

    /// Pass inline/display math spans through for client-side rendering.
    #[serde(default)]
    pub math: bool,
}
