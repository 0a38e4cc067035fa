// Disk usage via df, host mount first

use crate::config::ProbeConfig;
use crate::models::{CollectError, DiskStats, MetricResult, round1};
use std::time::Duration;
use tokio::process::Command;
use tracing::{instrument, warn};

pub struct DiskRepo {
    /// Mount paths tried in order: host bind mount, then our own root.
    candidates: Vec<String>,
    timeout: Duration,
}

impl DiskRepo {
    pub fn new(probe: &ProbeConfig) -> Self {
        let mut candidates = vec![probe.host_disk_root.clone()];
        if probe.host_disk_root != "/" {
            candidates.push("/".to_string());
        }
        Self {
            candidates,
            timeout: Duration::from_secs(probe.disk_timeout_secs),
        }
    }

    #[instrument(skip(self), fields(repo = "disk", operation = "get_disk"))]
    pub async fn get_disk(&self) -> MetricResult<DiskStats> {
        let mut last_err: Option<CollectError> = None;
        for path in &self.candidates {
            match self.run_df(path).await {
                Ok(stats) => return MetricResult::ok(stats),
                Err(e) => {
                    warn!(path = %path, error = %e, "df failed, trying next mount");
                    last_err = Some(e);
                }
            }
        }
        match last_err {
            Some(e) => MetricResult::unavailable(e.to_string()),
            None => MetricResult::unavailable("no disk mount candidates configured"),
        }
    }

    async fn run_df(&self, path: &str) -> Result<DiskStats, CollectError> {
        let output = tokio::time::timeout(
            self.timeout,
            Command::new("df")
                .args(["-BG", path])
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| CollectError::Timeout(self.timeout.as_secs()))?
        .map_err(|e| CollectError::Command(format!("df {path}: {e}")))?;

        if !output.status.success() {
            return Err(CollectError::Command(format!(
                "df {path} exited with {}",
                output.status
            )));
        }
        parse_df(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse df tabular output: one header line, one data row. A long device
/// name can wrap the data row onto a second physical line, so everything
/// after the header is joined before splitting into fields.
fn parse_df(output: &str) -> Result<DiskStats, CollectError> {
    let mut lines = output.lines();
    lines
        .next()
        .ok_or_else(|| CollectError::Parse("empty df output".into()))?;
    let data = lines.collect::<Vec<_>>().join(" ");
    let fields: Vec<&str> = data.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(CollectError::Parse(format!(
            "df data row has {} fields, expected at least 4",
            fields.len()
        )));
    }
    let total_gb = parse_gb(fields[1])?;
    let used_gb = parse_gb(fields[2])?;
    let available_gb = parse_gb(fields[3])?;
    let usage_percent = if total_gb > 0 {
        round1(used_gb as f64 / total_gb as f64 * 100.0)
    } else {
        0.0
    };
    Ok(DiskStats {
        total_gb,
        used_gb,
        available_gb,
        usage_percent,
    })
}

fn parse_gb(field: &str) -> Result<u64, CollectError> {
    field
        .trim_end_matches('G')
        .parse::<u64>()
        .map_err(|_| CollectError::Parse(format!("non-numeric df size field: {field}")))
}
