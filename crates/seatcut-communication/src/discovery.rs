//! Tool discovery through the local tool-minder helper.
//!
//! The helper service broadcasts on the LAN and answers
//! `GET /where_is_my_tool` with a JSON array of tool descriptors. We only
//! query that endpoint.

use crate::endpoint::ToolEndpoint;
use crate::error::{FabmoError, FabmoResult, TransportError};
use crate::transport::HttpTransport;
use serde::Deserialize;

/// Default address of the discovery helper
pub const DEFAULT_HELPER_URL: &str = "http://localhost:8080";

/// How to find tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Base URL of the discovery helper
    pub helper_url: String,
    /// Skip the network and return the public demo tool
    pub demo_mode: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            helper_url: DEFAULT_HELPER_URL.to_string(),
            demo_mode: false,
        }
    }
}

impl DiscoveryOptions {
    pub fn demo() -> Self {
        Self {
            demo_mode: true,
            ..Self::default()
        }
    }

    fn lookup_url(&self) -> String {
        format!("{}/where_is_my_tool", self.helper_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct ToolDescriptor {
    network: Vec<NetworkInterface>,
    server_port: u16,
    #[serde(default)]
    hostname: String,
}

#[derive(Debug, Deserialize)]
struct NetworkInterface {
    ip_address: String,
}

impl ToolDescriptor {
    fn into_endpoint(self) -> FabmoResult<ToolEndpoint> {
        let interface = self
            .network
            .into_iter()
            .next()
            .ok_or_else(|| FabmoError::DiscoveryFailed {
                reason: format!("tool '{}' reported no network interfaces", self.hostname),
            })?;
        Ok(ToolEndpoint::new(
            interface.ip_address,
            self.server_port,
            self.hostname,
        ))
    }
}

/// List the tools known to the discovery helper
pub fn find_tools<T: HttpTransport>(
    transport: &T,
    options: &DiscoveryOptions,
) -> FabmoResult<Vec<ToolEndpoint>> {
    if options.demo_mode {
        tracing::info!("Demo mode: using {}", ToolEndpoint::demo());
        return Ok(vec![ToolEndpoint::demo()]);
    }

    let url = options.lookup_url();
    tracing::debug!(url = %url, "Querying discovery helper");

    let response = transport.get(&url).map_err(|e| match e {
        TransportError::ConnectionRefused { .. } => FabmoError::DiscoveryUnavailable {
            url: options.helper_url.clone(),
        },
        other => FabmoError::DiscoveryFailed {
            reason: other.to_string(),
        },
    })?;

    let descriptors: Vec<ToolDescriptor> =
        serde_json::from_str(&response.body).map_err(|e| FabmoError::DiscoveryFailed {
            reason: format!("invalid helper response: {}", e),
        })?;

    let tools = descriptors
        .into_iter()
        .map(ToolDescriptor::into_endpoint)
        .collect::<FabmoResult<Vec<_>>>()?;

    tracing::info!(count = tools.len(), "Discovered tools");
    Ok(tools)
}

/// Require exactly one tool
pub fn select_single_tool(tools: Vec<ToolEndpoint>) -> FabmoResult<ToolEndpoint> {
    let count = tools.len();
    let mut iter = tools.into_iter();
    match (iter.next(), count) {
        (Some(tool), 1) => Ok(tool),
        (None, _) => Err(FabmoError::NoToolFound),
        _ => Err(FabmoError::MultipleToolsFound { count }),
    }
}

/// Discover tools and require exactly one
pub fn discover_single_tool<T: HttpTransport>(
    transport: &T,
    options: &DiscoveryOptions,
) -> FabmoResult<ToolEndpoint> {
    select_single_tool(find_tools(transport, options)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_url() {
        let options = DiscoveryOptions {
            helper_url: "http://localhost:8080/".to_string(),
            demo_mode: false,
        };
        assert_eq!(
            options.lookup_url(),
            "http://localhost:8080/where_is_my_tool"
        );
        assert_eq!(
            DiscoveryOptions::default().lookup_url(),
            "http://localhost:8080/where_is_my_tool"
        );
    }

    #[test]
    fn test_select_single_tool() {
        assert_eq!(select_single_tool(vec![]), Err(FabmoError::NoToolFound));

        let one = ToolEndpoint::new("10.0.0.5", 80, "bot");
        assert_eq!(select_single_tool(vec![one.clone()]), Ok(one.clone()));

        let two = vec![one.clone(), ToolEndpoint::new("10.0.0.6", 80, "bot2")];
        assert_eq!(
            select_single_tool(two),
            Err(FabmoError::MultipleToolsFound { count: 2 })
        );
    }

    #[test]
    fn test_descriptor_parsing() {
        let json = r#"{"network":[{"ip_address":"10.0.0.5","interface":"wlan0"}],"server_port":80,"hostname":"bot"}"#;
        let descriptor: ToolDescriptor = serde_json::from_str(json).unwrap();
        let tool = descriptor.into_endpoint().unwrap();
        assert_eq!(tool, ToolEndpoint::new("10.0.0.5", 80, "bot"));
    }

    #[test]
    fn test_descriptor_without_network() {
        let json = r#"{"network":[],"server_port":80,"hostname":"bot"}"#;
        let descriptor: ToolDescriptor = serde_json::from_str(json).unwrap();
        assert!(matches!(
            descriptor.into_endpoint(),
            Err(FabmoError::DiscoveryFailed { .. })
        ));
    }
}
