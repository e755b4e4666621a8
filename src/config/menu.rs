//! `[menu]` section configuration.
//!
//! Navigation menu entries, sourced from configuration rather than content.

use serde::{Deserialize, Serialize};

/// `[menu]` section in papyr.toml.
///
/// # Example
/// ```toml
/// [[menu.main]]
/// name = "Posts"
/// url = "/posts/"
/// weight = 1
///
/// [[menu.main]]
/// name = "GitHub"
/// url = "https://github.com/alice"
/// weight = 2
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuConfig {
    /// Main navigation entries.
    #[serde(default)]
    pub main: Vec<MenuEntry>,
}

/// One navigation entry. URLs are either site-relative (`/posts/`) or
/// absolute (`https://...`); external reachability is never checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuEntry {
    /// Display name.
    pub name: String,

    /// Target URL.
    pub url: String,

    /// Display order, ascending. Ties keep declaration order.
    #[serde(default)]
    pub weight: i32,
}

impl MenuEntry {
    /// Whether this entry points outside the site.
    pub fn is_external(&self) -> bool {
        self.url.starts_with("http://") || self.url.starts_with("https://")
    }
}

impl MenuConfig {
    /// Entries sorted ascending by weight; ties keep declaration order.
    pub fn sorted(&self) -> Vec<&MenuEntry> {
        let mut entries: Vec<&MenuEntry> = self.main.iter().collect();
        entries.sort_by_key(|e| e.weight);
        entries
    }
}
