//! Site configuration management for `papyr.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                        |
//! |-------------|------------------------------------------------|
//! | `[base]`    | Site metadata (title, author, url, language)   |
//! | `[build]`   | Content/output paths, pagination, build policy |
//! | `[markup]`  | Rendering policy (raw HTML, math)              |
//! | `[menu]`    | Navigation entries                             |
//! | `[outputs]` | Enabled output formats                         |
//! | `[params]`  | Theme toggles, home hero, social icons         |
//! | `[serve]`   | Development server (port, interface, watch)    |
//! | `[extra]`   | User-defined custom fields                     |
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "My Blog"
//! description = "A personal blog"
//! url = "https://example.com"
//!
//! [build]
//! content = "content"
//! output = "public"
//! page_size = 10
//!
//! [outputs]
//! home = ["html", "rss", "json"]
//!
//! [serve]
//! port = 1313
//! ```

mod base;
pub mod build;
pub mod defaults;
mod error;
mod markup;
mod menu;
pub mod outputs;
mod params;
mod serve;

// Re-export public types used by other modules
pub use base::BaseConfig;
pub use build::{BuildConfig, SlugCollision};
pub use error::ConfigError;
pub use markup::MarkupConfig;
pub use menu::{MenuConfig, MenuEntry};
pub use outputs::{OutputFormat, OutputsConfig};
pub use params::{HomeParams, ParamsConfig, SocialIcon};
pub use serve::ServeConfig;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing papyr.toml.
///
/// Loaded once at startup, leaked to `&'static` and passed by explicit
/// reference everywhere; never mutated after `update_with_cli`.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Markdown rendering policy
    #[serde(default)]
    pub markup: MarkupConfig,

    /// Navigation menu
    #[serde(default)]
    pub menu: MenuConfig,

    /// Enabled output formats
    #[serde(default)]
    pub outputs: OutputsConfig,

    /// Theme parameters
    #[serde(default)]
    pub params: ParamsConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// User-defined extra fields
    #[serde(default)]
    pub extra: HashMap<String, toml::Value>,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("."))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Build deadline as a duration.
    pub const fn deadline(&self) -> Duration {
        Duration::from_secs(self.build.timeout)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        let root = cli
            .root
            .as_ref()
            .cloned()
            .unwrap_or_else(|| self.get_root().to_owned());

        // Apply build-arg overrides before path normalization so that a CLI
        // destination is resolved against the root like a config value.
        let build_args = match &cli.command {
            Commands::Build { build_args } | Commands::Serve { build_args, .. } => build_args,
        };
        if let Some(destination) = &build_args.destination {
            self.build.output = destination.clone();
        }
        if build_args.strict {
            self.build.strict = true;
        }
        if build_args.include_drafts {
            self.build.drafts = true;
        }
        override_from(&mut self.build.minify, build_args.minify.as_ref());

        self.update_path_with_root(&root);

        if let Commands::Serve {
            interface,
            port,
            watch,
            ..
        } = &cli.command
        {
            override_from(&mut self.serve.interface, interface.as_ref());
            override_from(&mut self.serve.port, port.as_ref());
            override_from(&mut self.serve.watch, watch.as_ref());
            // Local preview links should point at the dev server
            self.base.url = Some(format!(
                "http://{}:{}",
                self.serve.interface, self.serve.port
            ));
        }
    }

    /// Update all paths relative to root directory and normalize to absolute paths
    fn update_path_with_root(&mut self, root: &Path) {
        let root = absolutize(root);

        let config_name = self
            .cli
            .map(|cli| cli.config.clone())
            .unwrap_or_else(|| PathBuf::from("papyr.toml"));

        self.config_path = absolutize(&root.join(config_name));
        self.build.content = absolutize(&root.join(&self.build.content));
        self.build.output = absolutize(&root.join(&self.build.output));

        self.set_root(&root);
    }

    /// Whether any feed format is enabled.
    pub fn feeds_enabled(&self) -> bool {
        self.outputs.enabled(OutputFormat::Rss) || self.outputs.enabled(OutputFormat::Json)
    }

    /// Validate configuration for the current command
    pub fn validate(&self) -> Result<()> {
        if !self.config_path.exists() {
            bail!("Config file not found");
        }

        if self.build.page_size == 0 {
            bail!(ConfigError::Invalid(
                "[build.page_size] must be at least 1".into()
            ));
        }

        if self.build.timeout == 0 {
            bail!(ConfigError::Invalid(
                "[build.timeout] must be at least 1 second".into()
            ));
        }

        if let Err(e) = self.build.ignore_patterns() {
            bail!(ConfigError::Invalid(format!(
                "[build.ignore_files] contains an invalid pattern: {e}"
            )));
        }

        if !crate::render::theme::is_known(&self.build.theme) {
            bail!(ConfigError::Invalid(format!(
                "[build.theme] unknown theme `{}`",
                self.build.theme
            )));
        }

        if self.serve.interface_addr().is_err() {
            bail!(ConfigError::Invalid(format!(
                "[serve.interface] `{}` is not an IP address",
                self.serve.interface
            )));
        }

        if self.feeds_enabled() && self.base.url.is_none() {
            bail!("[base.url] is required for feed generation");
        }

        if let Some(base_url) = &self.base.url
            && !base_url.starts_with("http")
        {
            bail!(ConfigError::Invalid(
                "[base.url] must start with http:// or https://".into()
            ));
        }

        Ok(())
    }
}

/// Replace `target` when the CLI provided a value.
fn override_from<T: Clone>(target: &mut T, value: Option<&T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

/// Absolute form of a path: canonical when it exists, joined onto the
/// current directory otherwise.
fn absolutize(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}
