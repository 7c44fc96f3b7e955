//! `[serve]` section configuration.
//!
//! Contains HTTP server settings.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 5280                 # HTTP port number
//! workers = 4                 # Request handler threads
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the server accessible from LAN.

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port number. When taken, the next free port is used.
    pub port: u16,

    /// Number of request handler threads.
    pub workers: usize,
}

pub struct ServeConfigFields {
    pub port: FieldPath,
    pub workers: FieldPath,
}

impl ServeConfig {
    pub const FIELDS: ServeConfigFields = ServeConfigFields {
        port: FieldPath::new("serve.port"),
        workers: FieldPath::new("serve.workers"),
    };

    /// Upper bound for `workers`.
    pub const MAX_WORKERS: usize = 64;

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.port == 0 {
            diag.error_with_hint(
                Self::FIELDS.port,
                "port 0 is not allowed",
                "pick a fixed port such as 5280",
            );
        }
        if self.workers == 0 || self.workers > Self::MAX_WORKERS {
            diag.error_with_hint(
                Self::FIELDS.workers,
                format!("`{}` worker threads is out of range", self.workers),
                format!("use a value between 1 and {}", Self::MAX_WORKERS),
            );
        }
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 5280,
            workers: 4,
        }
    }
}
