// Process raw Docker stats API response into a resource sample.

use crate::models::round1;
use bollard::models::ContainerStatsResponse;

const BYTES_PER_MB: f64 = 1_048_576.0;

/// Live resource usage computed from one non-streaming stats response.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResourceSample {
    pub cpu_percent: f64,
    pub memory_usage_mb: f64,
    pub memory_limit_mb: f64,
}

/// CPU percent comes from the delta between the response's current and
/// previous counter samples (the engine tracks the previous sample, not
/// us), scaled by online CPUs. Malformed payloads yield None.
pub(crate) fn process_statistics(s: &ContainerStatsResponse) -> Option<ResourceSample> {
    let cpu_stats = s.cpu_stats.as_ref()?;
    let precpu_stats = s.precpu_stats.as_ref()?;

    let cpu_usage = cpu_stats.cpu_usage.as_ref()?;
    let precpu_usage = precpu_stats.cpu_usage.as_ref()?;

    let cpu_delta =
        cpu_usage.total_usage.unwrap_or(0) as i64 - precpu_usage.total_usage.unwrap_or(0) as i64;
    let system_delta = cpu_stats.system_cpu_usage.unwrap_or(0) as i64
        - precpu_stats.system_cpu_usage.unwrap_or(0) as i64;
    let online = cpu_stats.online_cpus.unwrap_or(1) as f64;
    let cpu_percent = if system_delta > 0 && online > 0.0 {
        round1((cpu_delta as f64 / system_delta as f64) * online * 100.0)
    } else {
        0.0
    };

    let usage = s.memory_stats.as_ref().and_then(|m| m.usage).unwrap_or(0);
    let limit = s.memory_stats.as_ref().and_then(|m| m.limit).unwrap_or(0);

    Some(ResourceSample {
        cpu_percent,
        memory_usage_mb: round1(usage as f64 / BYTES_PER_MB),
        memory_limit_mb: round1(limit as f64 / BYTES_PER_MB),
    })
}
