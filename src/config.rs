use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub docker: DockerConfig,
    #[serde(default)]
    pub classification: ClassificationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

/// Where to find the host's pseudo-filesystems and mounts. When running in a
/// container the host's /proc and root filesystem are expected as bind mounts;
/// the local paths are the fallback for bare-metal deployments.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub host_proc_root: String,
    pub proc_root: String,
    pub host_disk_root: String,
    pub disk_timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            host_proc_root: "/host/proc".into(),
            proc_root: "/proc".into(),
            host_disk_root: "/host".into(),
            disk_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    /// Max running containers enriched with live stats per snapshot.
    pub stats_container_cap: usize,
    /// Wall-clock ceiling for the whole per-container stats batch.
    pub stats_batch_timeout_secs: u64,
    /// Timeout for a single stats API call.
    pub stats_call_timeout_secs: u64,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            stats_container_cap: 10,
            stats_batch_timeout_secs: 8,
            stats_call_timeout_secs: 3,
        }
    }
}

/// Presentation classification tables. Deployments can extend these without
/// code changes; the defaults match common Linux/Docker naming.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    pub physical_interface_prefixes: Vec<String>,
    pub virtual_interface_prefixes: Vec<String>,
    pub port_labels: Vec<PortLabel>,
    pub container_groups: Vec<ContainerGroupRule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortLabel {
    pub port: u16,
    pub name: String,
}

/// Ordered name-prefix matcher; first matching group wins. Containers
/// matching no group are project containers.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerGroupRule {
    pub name: String,
    pub prefixes: Vec<String>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        fn strings(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }
        Self {
            physical_interface_prefixes: strings(&["eth", "ens", "enp", "wlan"]),
            virtual_interface_prefixes: strings(&["br-", "veth", "docker", "virbr"]),
            port_labels: [
                (22, "ssh"),
                (80, "http"),
                (443, "https"),
                (3000, "dev server"),
                (5432, "postgres"),
                (6379, "redis"),
                (8000, "kong"),
                (8080, "http-alt"),
            ]
            .iter()
            .map(|(port, name)| PortLabel {
                port: *port,
                name: name.to_string(),
            })
            .collect(),
            container_groups: vec![
                ContainerGroupRule {
                    name: "supabase".into(),
                    prefixes: strings(&["supabase"]),
                },
                ContainerGroupRule {
                    name: "system".into(),
                    prefixes: strings(&["traefik", "portainer", "watchtower", "nginx", "certbot"]),
                },
            ],
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.probe.host_proc_root.is_empty(),
            "probe.host_proc_root must be non-empty"
        );
        anyhow::ensure!(
            !self.probe.proc_root.is_empty(),
            "probe.proc_root must be non-empty"
        );
        anyhow::ensure!(
            !self.probe.host_disk_root.is_empty(),
            "probe.host_disk_root must be non-empty"
        );
        anyhow::ensure!(
            self.probe.disk_timeout_secs > 0,
            "probe.disk_timeout_secs must be > 0, got {}",
            self.probe.disk_timeout_secs
        );
        anyhow::ensure!(
            self.docker.stats_container_cap > 0,
            "docker.stats_container_cap must be > 0, got {}",
            self.docker.stats_container_cap
        );
        anyhow::ensure!(
            self.docker.stats_batch_timeout_secs > 0,
            "docker.stats_batch_timeout_secs must be > 0, got {}",
            self.docker.stats_batch_timeout_secs
        );
        anyhow::ensure!(
            self.docker.stats_call_timeout_secs > 0,
            "docker.stats_call_timeout_secs must be > 0, got {}",
            self.docker.stats_call_timeout_secs
        );
        for group in &self.classification.container_groups {
            anyhow::ensure!(
                !group.name.is_empty(),
                "classification.container_groups entries must have a non-empty name"
            );
            anyhow::ensure!(
                !group.prefixes.is_empty(),
                "classification.container_groups.{} must have at least one prefix",
                group.name
            );
        }
        Ok(())
    }
}
