//! Server list payload.
//!
//! The fetch itself happens outside this crate; this is the wire model and
//! the fallback used when the endpoint is unset, unreachable or returns junk.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    #[serde(default, alias = "Name")]
    pub name: String,
    #[serde(default = "default_multiplier", alias = "Multiplier")]
    pub multiplier: String,
    #[serde(default, alias = "Online")]
    pub online: u32,
}

fn default_multiplier() -> String {
    "x1".to_string()
}

impl ServerInfo {
    pub fn is_online(&self) -> bool {
        self.online > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LauncherData {
    #[serde(default, alias = "OnlineNow")]
    pub online_now: u32,
    #[serde(default, alias = "Recommended")]
    pub recommended: Vec<ServerInfo>,
    #[serde(default, alias = "LastVisited")]
    pub last_visited: Vec<ServerInfo>,
    #[serde(default, alias = "AllServers")]
    pub all_servers: Vec<ServerInfo>,
}

impl LauncherData {
    /// Shown when no live data is available.
    pub fn fallback() -> Self {
        Self {
            all_servers: vec![ServerInfo {
                name: "Granted".to_string(),
                multiplier: default_multiplier(),
                online: 0,
            }],
            ..Default::default()
        }
    }

    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    pub fn from_json_or_fallback(body: &str) -> Self {
        match Self::from_json(body) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Server list payload rejected, using fallback: {}", e);
                Self::fallback()
            }
        }
    }
}
