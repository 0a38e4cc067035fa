// Docker container inventory and stats via bollard

mod stats;

use crate::config::DockerConfig;
use crate::models::{ContainerRecord, PortMapping};
use crate::proc_repo::format_bytes;
use bollard::Docker;
use bollard::query_parameters::{ListContainersOptions, StatsOptions};
use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

pub struct DockerRepo {
    docker: Docker,
    stats_cap: usize,
    call_timeout: Duration,
    batch_timeout: Duration,
}

impl DockerRepo {
    pub fn connect(config: &DockerConfig) -> anyhow::Result<Self> {
        let docker = Docker::connect_with_unix_defaults()?;
        Ok(Self {
            docker,
            stats_cap: config.stats_container_cap,
            call_timeout: Duration::from_secs(config.stats_call_timeout_secs),
            batch_timeout: Duration::from_secs(config.stats_batch_timeout_secs),
        })
    }

    /// Full container list (with disk sizes), running containers enriched
    /// with a live resource sample. Engine errors bubble up so the caller
    /// can report the whole branch unavailable; per-container stats
    /// failures only leave that container's resource fields absent.
    pub async fn get_inventory(&self) -> anyhow::Result<Vec<ContainerRecord>> {
        let options = ListContainersOptions {
            all: true,
            size: true,
            ..Default::default()
        };
        let listed = self.docker.list_containers(Some(options)).await?;
        let (mut records, stats_targets) = prepare_records(&listed, self.stats_cap);

        let docker = self.docker.clone();
        let call_timeout = self.call_timeout;
        let samples = settle_stats_batch(stats_targets, self.batch_timeout, move |id| {
            let docker = docker.clone();
            async move { fetch_one_sample(docker, &id, call_timeout).await }
        })
        .await;

        apply_samples(&mut records, &samples);
        sort_records(&mut records);
        Ok(records)
    }
}

/// Summarize the raw listing and select the running containers (up to the
/// cap) whose full ids get a stats query.
fn prepare_records(
    listed: &[bollard::models::ContainerSummary],
    stats_cap: usize,
) -> (Vec<ContainerRecord>, Vec<String>) {
    let mut records = Vec::with_capacity(listed.len());
    let mut stats_targets = Vec::new();
    for c in listed {
        let record = summarize(c);
        if record.is_running() && stats_targets.len() < stats_cap {
            if let Some(full_id) = c.id.as_ref() {
                stats_targets.push(full_id.clone());
            }
        }
        records.push(record);
    }
    (records, stats_targets)
}

/// Copy settled samples onto their records; containers without a sample
/// keep absent resource fields.
fn apply_samples(
    records: &mut [ContainerRecord],
    samples: &HashMap<String, stats::ResourceSample>,
) {
    for record in records {
        if let Some(sample) = samples.get(&record.id) {
            record.cpu_percent = Some(sample.cpu_percent);
            record.memory_usage_mb = Some(sample.memory_usage_mb);
            record.memory_limit_mb = Some(sample.memory_limit_mb);
        }
    }
}

/// Running containers first, then by name.
fn sort_records(records: &mut [ContainerRecord]) {
    records.sort_by(|a, b| {
        b.is_running()
            .cmp(&a.is_running())
            .then_with(|| a.name.cmp(&b.name))
    });
}

/// Fan out one stats fetch per id and wait for all of them to settle or
/// for the batch deadline, whichever comes first. Results are keyed by
/// the 12-char id prefix; fetches still pending at the deadline are
/// abandoned and their containers simply lack resource fields. Generic
/// over the fetch so it also runs against canned fixtures.
async fn settle_stats_batch<F, Fut>(
    ids: Vec<String>,
    batch_timeout: Duration,
    fetch: F,
) -> HashMap<String, stats::ResourceSample>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Option<stats::ResourceSample>>,
{
    let mut tasks = FuturesUnordered::new();
    for id in ids {
        let fut = fetch(id.clone());
        tasks.push(async move { (id, fut.await) });
    }

    let mut samples = HashMap::new();
    let deadline = tokio::time::sleep(batch_timeout);
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            next = tasks.next() => match next {
                Some((id, Some(sample))) => {
                    samples.insert(short_id(&id), sample);
                }
                Some((_, None)) => {}
                None => break,
            },
            _ = &mut deadline => {
                warn!(
                    pending = tasks.len(),
                    "stats batch deadline reached, keeping partial results"
                );
                break;
            }
        }
    }
    samples
}

async fn fetch_one_sample(
    docker: Docker,
    id: &str,
    call_timeout: Duration,
) -> Option<stats::ResourceSample> {
    let options = StatsOptions {
        stream: false,
        ..Default::default()
    };
    let query = async {
        let mut stream = docker.stats(id, Some(options));
        stream.next().await
    };
    match tokio::time::timeout(call_timeout, query).await {
        Ok(Some(Ok(response))) => stats::process_statistics(&response),
        Ok(Some(Err(e))) => {
            warn!(container = id, error = %e, "stats query failed");
            None
        }
        Ok(None) => None,
        Err(_) => {
            warn!(container = id, "stats query timed out");
            None
        }
    }
}

fn short_id(id: &str) -> String {
    id.chars().take(12).collect()
}

fn summarize(c: &bollard::models::ContainerSummary) -> ContainerRecord {
    let id = short_id(c.id.as_deref().unwrap_or_default());
    let name = c
        .names
        .as_ref()
        .and_then(|n| n.first())
        .map(|n| n.trim_start_matches('/').to_string())
        .unwrap_or_else(|| id.clone());
    let state = c.state.as_ref().map(|s| s.to_string()).unwrap_or_default();
    // Only mappings with a published host-side port survive
    let ports = c
        .ports
        .as_ref()
        .map(|ports| {
            ports
                .iter()
                .filter_map(|p| {
                    p.public_port.map(|public| PortMapping {
                        public,
                        private: p.private_port,
                        type_: p.typ.as_ref().map(|t| t.to_string()).unwrap_or_default(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    let size_human = c.size_rw.or(c.size_root_fs).map(|b| format_bytes(b.max(0) as u64));

    ContainerRecord {
        id,
        name,
        image: c.image.clone().unwrap_or_default(),
        state,
        status: c.status.clone().unwrap_or_default(),
        ports,
        cpu_percent: None,
        memory_usage_mb: None,
        memory_limit_mb: None,
        size_rw: c.size_rw,
        size_root_fs: c.size_root_fs,
        size_human,
    }
}
