// Snapshot aggregation: concurrent collection plus reconciliation passes

use crate::config::{ClassificationConfig, ContainerGroupRule, PortLabel};
use crate::disk_repo::DiskRepo;
use crate::docker_repo::DockerRepo;
use crate::models::{
    ContainerGroup, ContainerRecord, DockerSection, InterfaceStat, NetworkReport, PortRecord,
    PortsReport, Snapshot, SystemSection,
};
use crate::proc_repo::ProcRepo;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{instrument, warn};

pub struct SnapshotService {
    proc_repo: Arc<ProcRepo>,
    disk_repo: Arc<DiskRepo>,
    docker_repo: Option<Arc<DockerRepo>>,
    classification: ClassificationConfig,
}

impl SnapshotService {
    pub fn new(
        proc_repo: Arc<ProcRepo>,
        disk_repo: Arc<DiskRepo>,
        docker_repo: Option<Arc<DockerRepo>>,
        classification: ClassificationConfig,
    ) -> Self {
        Self {
            proc_repo,
            disk_repo,
            docker_repo,
            classification,
        }
    }

    /// Collect one full snapshot. Every branch runs concurrently and
    /// degrades independently; this method itself never fails.
    #[instrument(skip(self), fields(operation = "collect_snapshot"))]
    pub async fn collect(&self) -> Snapshot {
        let (memory, cpu, uptime, network, disk, ports, docker) = tokio::join!(
            self.proc_repo.get_memory(),
            self.proc_repo.get_cpu(),
            self.proc_repo.get_uptime(),
            self.proc_repo.get_network(
                &self.classification.physical_interface_prefixes,
                &self.classification.virtual_interface_prefixes,
            ),
            self.disk_repo.get_disk(),
            self.proc_repo.get_ports(),
            self.collect_docker(),
        );

        let container_ports: HashSet<u16> = docker
            .containers
            .as_deref()
            .unwrap_or_default()
            .iter()
            .flat_map(|c| c.ports.iter().map(|p| p.public))
            .collect();

        let network = network.map(|interfaces| {
            let (physical, virtual_) = classify_interfaces(&interfaces, &self.classification);
            NetworkReport {
                interfaces,
                physical,
                virtual_,
            }
        });

        let ports = ports.map(|mut listening| {
            label_ports(&mut listening, &self.classification.port_labels);
            let host_only = host_only_ports(&listening, &container_ports);
            PortsReport {
                listening,
                host_only,
            }
        });

        Snapshot {
            timestamp: now_millis(),
            system: SystemSection {
                memory,
                cpu,
                uptime,
                network,
                disk,
                ports,
            },
            docker,
        }
    }

    async fn collect_docker(&self) -> DockerSection {
        let Some(repo) = &self.docker_repo else {
            return DockerSection::unavailable("docker socket not available");
        };
        match repo.get_inventory().await {
            Ok(containers) => {
                let (groups, projects) =
                    group_containers(&containers, &self.classification.container_groups);
                DockerSection {
                    available: true,
                    containers: Some(containers),
                    groups: Some(groups),
                    projects: Some(projects),
                    error: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "docker inventory failed");
                DockerSection::unavailable(e.to_string())
            }
        }
    }
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            warn!(error = %e, operation = "get_timestamp", "system time error");
            0
        })
}

/// Listening ports not published by any container.
pub fn host_only_ports(listening: &[PortRecord], container_ports: &HashSet<u16>) -> Vec<PortRecord> {
    listening
        .iter()
        .filter(|p| !container_ports.contains(&p.port))
        .cloned()
        .collect()
}

/// Annotate well-known ports with their configured service name.
pub fn label_ports(ports: &mut [PortRecord], labels: &[PortLabel]) {
    for record in ports {
        record.name = labels
            .iter()
            .find(|l| l.port == record.port)
            .map(|l| l.name.clone());
    }
}

/// Partition interface names into physical and virtual, independent of the
/// display sort order already applied to the list.
pub fn classify_interfaces(
    interfaces: &[InterfaceStat],
    classification: &ClassificationConfig,
) -> (Vec<String>, Vec<String>) {
    let mut physical = Vec::new();
    let mut virtual_ = Vec::new();
    for iface in interfaces {
        let is_physical = classification
            .physical_interface_prefixes
            .iter()
            .any(|p| iface.name.starts_with(p.as_str()));
        if is_physical {
            physical.push(iface.name.clone());
        } else {
            virtual_.push(iface.name.clone());
        }
    }
    (physical, virtual_)
}

/// Assign containers to the first group rule whose prefix matches their
/// name; everything unmatched is a project container. Empty groups are
/// omitted. Pure presentation: the records themselves are untouched.
pub fn group_containers(
    containers: &[ContainerRecord],
    rules: &[ContainerGroupRule],
) -> (Vec<ContainerGroup>, Vec<String>) {
    let mut groups: Vec<ContainerGroup> = rules
        .iter()
        .map(|rule| ContainerGroup {
            name: rule.name.clone(),
            containers: Vec::new(),
        })
        .collect();
    let mut projects = Vec::new();

    for container in containers {
        let matched = rules.iter().position(|rule| {
            rule.prefixes
                .iter()
                .any(|p| container.name.starts_with(p.as_str()))
        });
        match matched {
            Some(i) => groups[i].containers.push(container.name.clone()),
            None => projects.push(container.name.clone()),
        }
    }

    groups.retain(|g| !g.containers.is_empty());
    (groups, projects)
}
