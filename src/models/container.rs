// Docker container models

use serde::{Deserialize, Serialize};

/// A port mapping with a published host-side port. Mappings without a
/// public port are dropped during collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMapping {
    pub public: u16,
    pub private: u16,
    #[serde(rename = "type")]
    pub type_: String,
}

/// One container from the engine's list endpoint, optionally enriched with
/// a live resource sample. Resource fields are absent (not zero) when the
/// container is not running or its stats query did not settle in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRecord {
    /// 12-character id prefix.
    pub id: String,
    /// Primary name with the API's leading slash stripped.
    pub name: String,
    pub image: String,
    /// Engine state string, passed through verbatim (e.g. "running").
    pub state: String,
    pub status: String,
    pub ports: Vec<PortMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_usage_mb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit_mb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_rw: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_root_fs: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_human: Option<String>,
}

impl ContainerRecord {
    pub fn is_running(&self) -> bool {
        self.state == "running"
    }
}

/// Presentation bucket for infrastructure containers (e.g. "supabase",
/// "system"); holds container names only, the records stay flat.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerGroup {
    pub name: String,
    pub containers: Vec<String>,
}
