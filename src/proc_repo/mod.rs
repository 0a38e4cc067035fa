// Host metrics from the proc pseudo-filesystem

mod parse;

pub use parse::format_bytes;

use crate::config::ProbeConfig;
use crate::models::{
    CpuStats, InterfaceStat, MemoryStats, MetricResult, PortRecord, UptimeStats,
};
use std::path::PathBuf;
use tracing::{instrument, warn};

/// Log and wrap a degraded metric; the enclosing span names the operation.
fn degrade<T>(error: impl Into<String>) -> MetricResult<T> {
    let error = error.into();
    warn!(error = %error, "metric collection degraded");
    MetricResult::unavailable(error)
}

/// Reads proc pseudo-files, preferring a host-mounted proc root over the
/// process's own. Inside a container the own view may be an isolated
/// namespace, so network files additionally prefer PID 1's namespace.
pub struct ProcRepo {
    roots: Vec<PathBuf>,
}

impl ProcRepo {
    pub fn new(probe: &ProbeConfig) -> Self {
        let mut roots = vec![PathBuf::from(&probe.host_proc_root)];
        if probe.proc_root != probe.host_proc_root {
            roots.push(PathBuf::from(&probe.proc_root));
        }
        Self { roots }
    }

    /// Read one relative proc path, trying the host root first. Absence is
    /// absorbed here: missing or unreadable paths yield None, never an error.
    async fn read_proc(&self, rel: &str) -> Option<String> {
        for root in &self.roots {
            let path = root.join(rel);
            if let Ok(text) = tokio::fs::read_to_string(&path).await {
                return Some(text);
            }
        }
        None
    }

    /// Read a per-namespace net file, preferring PID 1's view within each root.
    async fn read_net(&self, file: &str) -> Option<String> {
        let pid1 = format!("1/net/{file}");
        let own = format!("net/{file}");
        match self.read_proc(&pid1).await {
            Some(text) => Some(text),
            None => self.read_proc(&own).await,
        }
    }

    #[instrument(skip(self), fields(repo = "proc", operation = "get_memory"))]
    pub async fn get_memory(&self) -> MetricResult<MemoryStats> {
        match self.read_proc("meminfo").await {
            Some(text) => match parse::parse_meminfo(&text) {
                Ok(stats) => MetricResult::ok(stats),
                Err(e) => degrade(e.to_string()),
            },
            None => degrade("meminfo not readable under any proc root"),
        }
    }

    #[instrument(skip(self), fields(repo = "proc", operation = "get_cpu"))]
    pub async fn get_cpu(&self) -> MetricResult<CpuStats> {
        let loadavg = match self.read_proc("loadavg").await {
            Some(text) => text,
            None => return degrade("loadavg not readable under any proc root"),
        };
        let cpuinfo = self.read_proc("cpuinfo").await;
        let cores = parse::count_cores(cpuinfo.as_deref());
        match parse::parse_loadavg(&loadavg, cores) {
            Ok(stats) => MetricResult::ok(stats),
            Err(e) => degrade(e.to_string()),
        }
    }

    #[instrument(skip(self), fields(repo = "proc", operation = "get_uptime"))]
    pub async fn get_uptime(&self) -> MetricResult<UptimeStats> {
        match self.read_proc("uptime").await {
            Some(text) => match parse::parse_uptime(&text) {
                Ok(stats) => MetricResult::ok(stats),
                Err(e) => degrade(e.to_string()),
            },
            None => degrade("uptime not readable under any proc root"),
        }
    }

    /// Per-interface RX/TX counters, loopback excluded, physical-first sort.
    #[instrument(skip_all, fields(repo = "proc", operation = "get_network"))]
    pub async fn get_network(
        &self,
        physical_prefixes: &[String],
        virtual_prefixes: &[String],
    ) -> MetricResult<Vec<InterfaceStat>> {
        let text = match self.read_net("dev").await {
            Some(text) => text,
            None => return degrade("net/dev not readable in any namespace"),
        };
        match parse::parse_net_dev(&text) {
            Ok(mut interfaces) => {
                parse::sort_interfaces(&mut interfaces, physical_prefixes, virtual_prefixes);
                MetricResult::ok(interfaces)
            }
            Err(e) => degrade(e.to_string()),
        }
    }

    /// Union of LISTEN ports across the IPv4 and IPv6 socket tables from
    /// PID 1's namespace and our own, deduplicated by port number.
    #[instrument(skip(self), fields(repo = "proc", operation = "get_ports"))]
    pub async fn get_ports(&self) -> MetricResult<Vec<PortRecord>> {
        let mut tables = Vec::with_capacity(4);
        for (rel, protocol) in [
            ("1/net/tcp", "tcp"),
            ("1/net/tcp6", "tcp6"),
            ("net/tcp", "tcp"),
            ("net/tcp6", "tcp6"),
        ] {
            if let Some(text) = self.read_proc(rel).await {
                tables.push(parse::parse_socket_table(&text, protocol));
            }
        }
        let ports = parse::merge_ports(tables);
        if ports.is_empty() {
            degrade("no listening ports found in any socket table")
        } else {
            MetricResult::ok(ports)
        }
    }
}
