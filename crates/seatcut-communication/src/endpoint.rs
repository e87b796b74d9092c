//! Network address of a FabMo tool.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host of the public demo tool
pub const DEMO_HOST: &str = "demo.gofabmo.org";

/// A tool reachable over HTTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolEndpoint {
    /// IP address or host name
    pub address: String,
    /// HTTP port of the tool's server
    pub port: u16,
    /// Host name reported by discovery (may be empty)
    #[serde(default)]
    pub hostname: String,
}

impl ToolEndpoint {
    pub fn new(address: impl Into<String>, port: u16, hostname: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            port,
            hostname: hostname.into(),
        }
    }

    /// The public demo tool
    pub fn demo() -> Self {
        Self::new(DEMO_HOST, 80, DEMO_HOST)
    }

    /// `http://address:port`
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.address, self.port)
    }

    /// Absolute URL of `path` on this tool
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    pub fn dashboard_url(&self) -> String {
        self.url("/")
    }

    pub fn job_manager_url(&self) -> String {
        self.url("/#/app/job-manager")
    }
}

impl fmt::Display for ToolEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hostname.is_empty() || self.hostname == self.address {
            write!(f, "{}:{}", self.address, self.port)
        } else {
            write!(f, "{} ({}:{})", self.hostname, self.address, self.port)
        }
    }
}
