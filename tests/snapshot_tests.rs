// Aggregator tests: partial failure containment and determinism

use servermon::config::{ClassificationConfig, ProbeConfig};
use servermon::disk_repo::DiskRepo;
use servermon::proc_repo::ProcRepo;
use servermon::snapshot::SnapshotService;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const MEMINFO: &str = "MemTotal:       16777216 kB\nMemAvailable:    8388608 kB\n";
const LOADAVG: &str = "1.00 0.80 0.60 2/300 4321\n";
const CPUINFO: &str = "processor\t: 0\n\nprocessor\t: 1\n";
const UPTIME: &str = "90061.00 150000.00\n";
const NET_DEV: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
  eth0: 2048 20 0 0 0 0 0 0 4096 40 0 0 0 0 0 0
docker0: 100 1 0 0 0 0 0 0 200 2 0 0 0 0 0 0
";
const TCP_TABLE: &str = "\
  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode
   0: 00000000:1F90 00000000:0000 0A 00000000:00000000 00:00000000 00000000  1000        0 1 1 0 100 0 0 10 0
   1: 00000000:2382 00000000:0000 0A 00000000:00000000 00:00000000 00000000  1000        0 2 1 0 100 0 0 10 0
";

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture_probe(host_root: &Path) -> ProbeConfig {
    ProbeConfig {
        host_proc_root: host_root.display().to_string(),
        // Same bogus own root so only the fixture tree is visible
        proc_root: host_root.join("none").display().to_string(),
        host_disk_root: "/nonexistent-mount".into(),
        disk_timeout_secs: 5,
    }
}

fn populated_fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "meminfo", MEMINFO);
    write(dir.path(), "loadavg", LOADAVG);
    write(dir.path(), "cpuinfo", CPUINFO);
    write(dir.path(), "uptime", UPTIME);
    write(dir.path(), "1/net/dev", NET_DEV);
    write(dir.path(), "1/net/tcp", TCP_TABLE);
    dir
}

fn service(host_root: &Path) -> SnapshotService {
    let probe = fixture_probe(host_root);
    SnapshotService::new(
        Arc::new(ProcRepo::new(&probe)),
        Arc::new(DiskRepo::new(&probe)),
        None, // docker engine unreachable
        ClassificationConfig::default(),
    )
}

#[tokio::test]
async fn snapshot_reports_docker_unavailable_while_system_metrics_succeed() {
    let fixture = populated_fixture();
    let snapshot = service(fixture.path()).collect().await;

    assert!(!snapshot.docker.available);
    assert!(!snapshot.docker.error.as_deref().unwrap_or_default().is_empty());
    assert!(snapshot.docker.containers.is_none());

    assert!(snapshot.system.memory.available);
    assert!(snapshot.system.cpu.available);
    assert!(snapshot.system.uptime.available);
    assert!(snapshot.system.network.available);
    assert!(snapshot.system.ports.available);
}

#[tokio::test]
async fn snapshot_never_fails_even_with_every_source_missing() {
    let empty = TempDir::new().unwrap();
    let snapshot = service(empty.path()).collect().await;

    assert!(!snapshot.system.memory.available);
    assert!(!snapshot.system.cpu.available);
    assert!(!snapshot.system.uptime.available);
    assert!(!snapshot.system.network.available);
    assert!(!snapshot.system.ports.available);
    assert!(!snapshot.docker.available);
    for error in [
        &snapshot.system.memory.error,
        &snapshot.system.cpu.error,
        &snapshot.system.uptime.error,
        &snapshot.system.network.error,
        &snapshot.system.ports.error,
    ] {
        assert!(error.is_some());
    }
}

#[tokio::test]
async fn snapshot_classifies_interfaces_and_labels_ports() {
    let fixture = populated_fixture();
    let snapshot = service(fixture.path()).collect().await;

    let network = snapshot.system.network.data.unwrap();
    assert_eq!(network.physical, vec!["eth0"]);
    assert_eq!(network.virtual_, vec!["docker0"]);
    // Display order: physical before virtual
    assert_eq!(network.interfaces[0].name, "eth0");

    let ports = snapshot.system.ports.data.unwrap();
    let numbers: Vec<u16> = ports.listening.iter().map(|p| p.port).collect();
    assert_eq!(numbers, vec![8080, 9090]);
    let p8080 = ports.listening.iter().find(|p| p.port == 8080).unwrap();
    assert_eq!(p8080.name.as_deref(), Some("http-alt"));
    // No container inventory, so every listening port is host-only
    assert_eq!(ports.host_only.len(), 2);
}

#[tokio::test]
async fn snapshot_is_deterministic_for_identical_sources() {
    let fixture = populated_fixture();
    let svc = service(fixture.path());
    let first = svc.collect().await;
    let second = svc.collect().await;

    // Timestamps are inherently time-varying but monotonically non-decreasing
    assert!(second.timestamp >= first.timestamp);

    let stable = |s: &servermon::models::Snapshot| {
        serde_json::json!({
            "memory": s.system.memory,
            "cpu": s.system.cpu,
            "uptime": s.system.uptime,
            "network": s.system.network,
            "ports": s.system.ports,
            "docker": s.docker,
        })
    };
    assert_eq!(stable(&first), stable(&second));
}
