//! `[serve]` section configuration.
//!
//! Settings for the in-memory development server.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::net::{AddrParseError, IpAddr};

/// `[serve]` section in papyr.toml.
///
/// # Example
/// ```toml
/// [serve]
/// interface = "0.0.0.0"   # expose on the LAN
/// port = 8000
/// watch = false           # serve a single build, no rebuilds
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ServeConfig {
    /// Interface to bind; `127.0.0.1` keeps the server local-only.
    #[serde(default = "defaults::serve::interface")]
    #[educe(Default = defaults::serve::interface())]
    pub interface: String,

    /// Base HTTP port. Taken ports are probed upward from here.
    #[serde(default = "defaults::serve::port")]
    #[educe(Default = defaults::serve::port())]
    pub port: u16,

    /// Rebuild and swap the route table when content changes.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub watch: bool,
}

impl ServeConfig {
    /// The configured interface as an address the server can bind.
    pub fn interface_addr(&self) -> Result<IpAddr, AddrParseError> {
        self.interface.parse()
    }
}
