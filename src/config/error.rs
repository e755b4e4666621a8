//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating `papyr.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file `{path}`")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
