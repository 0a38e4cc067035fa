// Host metric models: memory, CPU load, uptime, network, disk, ports

use serde::{Deserialize, Serialize};

/// Round to one decimal, the precision used everywhere on the wire.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Derived from meminfo; used + available adds back up to total.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStats {
    pub total_gb: f64,
    pub used_gb: f64,
    pub available_gb: f64,
    pub usage_percent: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuStats {
    pub load1: f64,
    pub load5: f64,
    pub load15: f64,
    pub cores: u32,
    /// min(100, 100 * load1 / cores)
    pub usage_percent: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UptimeStats {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceStat {
    pub name: String,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_human: String,
    pub tx_human: String,
}

/// Interfaces in display order plus the physical/virtual partition by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkReport {
    pub interfaces: Vec<InterfaceStat>,
    pub physical: Vec<String>,
    #[serde(rename = "virtual")]
    pub virtual_: Vec<String>,
}

/// Integer GB values as reported by df.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskStats {
    pub total_gb: u64,
    pub used_gb: u64,
    pub available_gb: u64,
    pub usage_percent: f64,
}

/// One listening TCP port. Ports found in both the IPv4 and IPv6 tables
/// collapse to a single record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortRecord {
    pub port: u16,
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortsReport {
    pub listening: Vec<PortRecord>,
    /// Listening ports not published by any container.
    pub host_only: Vec<PortRecord>,
}
