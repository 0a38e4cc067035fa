// Root snapshot aggregate

use serde::{Deserialize, Serialize};

use super::container::{ContainerGroup, ContainerRecord};
use super::metric::MetricResult;
use super::system::{
    CpuStats, DiskStats, MemoryStats, NetworkReport, PortsReport, UptimeStats,
};

/// One complete, request-scoped aggregation of all metrics and container
/// inventory. Built fresh per request; nothing persists between calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Milliseconds since epoch at collection time.
    pub timestamp: u64,
    pub system: SystemSection,
    pub docker: DockerSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSection {
    pub memory: MetricResult<MemoryStats>,
    pub cpu: MetricResult<CpuStats>,
    pub uptime: MetricResult<UptimeStats>,
    pub network: MetricResult<NetworkReport>,
    pub disk: MetricResult<DiskStats>,
    pub ports: MetricResult<PortsReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockerSection {
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub containers: Option<Vec<ContainerRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<ContainerGroup>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DockerSection {
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            available: false,
            containers: None,
            groups: None,
            projects: None,
            error: Some(error.into()),
        }
    }
}
