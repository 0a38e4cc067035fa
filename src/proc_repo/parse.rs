// Pure parsers for proc pseudo-file text formats.

use crate::models::{
    CollectError, CpuStats, InterfaceStat, MemoryStats, PortRecord, UptimeStats, round1,
};
use std::collections::BTreeMap;

const KB_PER_GB: f64 = 1_048_576.0;

/// Kernel connection-state code for LISTEN in /proc/net/tcp*.
const TCP_LISTEN: &str = "0A";

/// Format a byte count as B/KB/MB/GB/TB with one decimal.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

fn labeled_kb(text: &str, label: &str) -> Result<f64, CollectError> {
    text.lines()
        .find(|line| line.starts_with(label))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|v| v.parse::<f64>().ok())
        .ok_or_else(|| CollectError::Parse(format!("meminfo field {label} missing or non-numeric")))
}

/// Derive memory stats from meminfo text. Used is total minus available,
/// so the three GB figures stay consistent.
pub fn parse_meminfo(text: &str) -> Result<MemoryStats, CollectError> {
    let total_gb = labeled_kb(text, "MemTotal:")? / KB_PER_GB;
    let available_gb = labeled_kb(text, "MemAvailable:")? / KB_PER_GB;
    let used_gb = (total_gb - available_gb).max(0.0);
    let usage_percent = if total_gb > 0.0 {
        used_gb / total_gb * 100.0
    } else {
        0.0
    };
    Ok(MemoryStats {
        total_gb: round1(total_gb),
        used_gb: round1(used_gb),
        available_gb: round1(available_gb),
        usage_percent: round1(usage_percent),
    })
}

/// Count `processor :` entries in cpuinfo text; at least 1.
pub fn count_cores(cpuinfo: Option<&str>) -> u32 {
    let count = cpuinfo
        .map(|text| {
            text.lines()
                .filter(|line| line.starts_with("processor") && line.contains(':'))
                .count() as u32
        })
        .unwrap_or(0);
    count.max(1)
}

/// Parse the three load averages from loadavg text and normalize load1
/// against the core count, capped at 100%.
pub fn parse_loadavg(text: &str, cores: u32) -> Result<CpuStats, CollectError> {
    let mut fields = text.split_whitespace();
    let mut next_load = || -> Result<f64, CollectError> {
        fields
            .next()
            .and_then(|v| v.parse::<f64>().ok())
            .ok_or_else(|| CollectError::Parse("loadavg missing load fields".into()))
    };
    let load1 = next_load()?;
    let load5 = next_load()?;
    let load15 = next_load()?;
    let cores = cores.max(1);
    let usage_percent = round1((load1 / cores as f64 * 100.0).min(100.0));
    Ok(CpuStats {
        load1,
        load5,
        load15,
        cores,
        usage_percent,
    })
}

/// Decompose the first seconds token of uptime text into days/hours/minutes.
pub fn parse_uptime(text: &str) -> Result<UptimeStats, CollectError> {
    let seconds = text
        .split_whitespace()
        .next()
        .and_then(|v| v.parse::<f64>().ok())
        .ok_or_else(|| CollectError::Parse("uptime missing seconds field".into()))?;
    let total = seconds.max(0.0) as u64;
    Ok(UptimeStats {
        days: total / 86_400,
        hours: (total % 86_400) / 3_600,
        minutes: (total % 3_600) / 60,
    })
}

/// Parse net/dev counter rows: rx bytes is counter field 0, tx bytes is
/// counter field 8 of the sixteen-field row. Loopback is skipped.
pub fn parse_net_dev(text: &str) -> Result<Vec<InterfaceStat>, CollectError> {
    let mut interfaces = Vec::new();
    for line in text.lines() {
        let Some((name, counters)) = line.split_once(':') else {
            continue; // header lines have no colon
        };
        let name = name.trim();
        if name.is_empty() || name == "lo" {
            continue;
        }
        let fields: Vec<&str> = counters.split_whitespace().collect();
        if fields.len() < 16 {
            continue;
        }
        let rx_bytes = fields[0].parse::<u64>().unwrap_or(0);
        let tx_bytes = fields[8].parse::<u64>().unwrap_or(0);
        interfaces.push(InterfaceStat {
            name: name.to_string(),
            rx_bytes,
            tx_bytes,
            rx_human: format_bytes(rx_bytes),
            tx_human: format_bytes(tx_bytes),
        });
    }
    if interfaces.is_empty() {
        return Err(CollectError::Parse("no interface rows in net/dev".into()));
    }
    Ok(interfaces)
}

fn interface_rank(name: &str, physical: &[String], virtual_: &[String]) -> u8 {
    if physical.iter().any(|p| name.starts_with(p.as_str())) {
        0
    } else if virtual_.iter().any(|p| name.starts_with(p.as_str())) {
        2
    } else {
        1
    }
}

/// Sort physical interfaces first, bridge/veth-style interfaces last,
/// unclassified names in between; ties break lexicographically.
pub fn sort_interfaces(interfaces: &mut [InterfaceStat], physical: &[String], virtual_: &[String]) {
    interfaces.sort_by(|a, b| {
        interface_rank(&a.name, physical, virtual_)
            .cmp(&interface_rank(&b.name, physical, virtual_))
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Parse one /proc/net/tcp-style socket table into LISTEN port records.
/// Field 3 is the connection state; field 1 ends in the hex local port.
pub fn parse_socket_table(text: &str, protocol: &str) -> Vec<PortRecord> {
    let mut ports = Vec::new();
    for line in text.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 || !fields[3].eq_ignore_ascii_case(TCP_LISTEN) {
            continue;
        }
        let Some((_, port_hex)) = fields[1].rsplit_once(':') else {
            continue;
        };
        if let Ok(port) = u32::from_str_radix(port_hex, 16)
            && port > 0
            && port <= u16::MAX as u32
        {
            ports.push(PortRecord {
                port: port as u16,
                protocol: protocol.to_string(),
                name: None,
            });
        }
    }
    ports
}

/// Union port tables, deduplicating by port number (the first table to
/// report a port supplies its protocol tag), sorted ascending.
pub fn merge_ports(tables: Vec<Vec<PortRecord>>) -> Vec<PortRecord> {
    let mut merged: BTreeMap<u16, PortRecord> = BTreeMap::new();
    for table in tables {
        for record in table {
            merged.entry(record.port).or_insert(record);
        }
    }
    merged.into_values().collect()
}
