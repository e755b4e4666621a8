//! `[params]` section configuration.
//!
//! Theme feature toggles, home-page hero parameters and social icon links.

use serde::{Deserialize, Serialize};

/// `[params]` section in papyr.toml.
///
/// # Example
/// ```toml
/// [params]
/// show_reading_time = true
/// show_share_buttons = true
///
/// [params.home]
/// title = "Hi there"
/// content = "Welcome to my blog"
///
/// [[params.social]]
/// name = "github"
/// url = "https://github.com/alice"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamsConfig {
    /// Render share links on single pages.
    #[serde(default)]
    pub show_share_buttons: bool,

    /// Render estimated reading time on single pages.
    #[serde(default)]
    pub show_reading_time: bool,

    /// Wrap code blocks with a copy-button affordance.
    #[serde(default)]
    pub show_code_copy_buttons: bool,

    /// Render the comments container on single pages.
    #[serde(default)]
    pub comments: bool,

    /// Home page hero parameters.
    #[serde(default)]
    pub home: HomeParams,

    /// Social icon links shown on the home page.
    #[serde(default)]
    pub social: Vec<SocialIcon>,
}

/// `[params.home]` - hero text shown above the post list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HomeParams {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub content: String,
}

/// `[[params.social]]` - one social icon link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocialIcon {
    /// Icon name (e.g., "github", "linkedin", "rss").
    pub name: String,

    /// Link target.
    pub url: String,
}
