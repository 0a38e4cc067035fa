// Config loading and validation tests

use servermon::config::AppConfig;

const VALID_CONFIG: &str = r#"
[server]
port = 8090
host = "0.0.0.0"

[probe]
host_proc_root = "/host/proc"
proc_root = "/proc"
host_disk_root = "/host"
disk_timeout_secs = 5

[docker]
stats_container_cap = 10
stats_batch_timeout_secs = 8
stats_call_timeout_secs = 3
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.server.port, 8090);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.probe.host_proc_root, "/host/proc");
    assert_eq!(config.probe.disk_timeout_secs, 5);
    assert_eq!(config.docker.stats_container_cap, 10);
    assert_eq!(config.docker.stats_batch_timeout_secs, 8);
}

#[test]
fn test_config_minimal_uses_section_defaults() {
    let config = AppConfig::load_from_str(
        r#"
[server]
port = 8090
host = "127.0.0.1"
"#,
    )
    .expect("minimal config");
    assert_eq!(config.probe.host_proc_root, "/host/proc");
    assert_eq!(config.probe.proc_root, "/proc");
    assert_eq!(config.docker.stats_container_cap, 10);
    assert_eq!(config.docker.stats_call_timeout_secs, 3);
    assert!(
        config
            .classification
            .physical_interface_prefixes
            .iter()
            .any(|p| p == "eth")
    );
    assert!(
        config
            .classification
            .container_groups
            .iter()
            .any(|g| g.name == "supabase")
    );
}

#[test]
fn test_config_classification_is_overridable() {
    let config = AppConfig::load_from_str(
        r#"
[server]
port = 8090
host = "0.0.0.0"

[classification]
physical_interface_prefixes = ["en"]
virtual_interface_prefixes = ["vbr"]
port_labels = [{ port = 1234, name = "custom" }]

[[classification.container_groups]]
name = "databases"
prefixes = ["pg-", "mysql-"]
"#,
    )
    .expect("classification override");
    assert_eq!(config.classification.physical_interface_prefixes, vec!["en"]);
    assert_eq!(config.classification.container_groups.len(), 1);
    assert_eq!(config.classification.container_groups[0].name, "databases");
    assert_eq!(config.classification.port_labels[0].port, 1234);
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 8090", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_validation_rejects_empty_proc_root() {
    let bad = VALID_CONFIG.replace("host_proc_root = \"/host/proc\"", "host_proc_root = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("host_proc_root"));
}

#[test]
fn test_config_validation_rejects_zero_disk_timeout() {
    let bad = VALID_CONFIG.replace("disk_timeout_secs = 5", "disk_timeout_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("disk_timeout_secs"));
}

#[test]
fn test_config_validation_rejects_zero_stats_cap() {
    let bad = VALID_CONFIG.replace("stats_container_cap = 10", "stats_container_cap = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("stats_container_cap"));
}

#[test]
fn test_config_validation_rejects_zero_batch_timeout() {
    let bad = VALID_CONFIG.replace(
        "stats_batch_timeout_secs = 8",
        "stats_batch_timeout_secs = 0",
    );
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("stats_batch_timeout_secs"));
}

#[test]
fn test_config_validation_rejects_group_without_prefixes() {
    let config = format!(
        "{VALID_CONFIG}\n[[classification.container_groups]]\nname = \"empty\"\nprefixes = []\n"
    );
    let err = AppConfig::load_from_str(&config).unwrap_err();
    assert!(err.to_string().contains("at least one prefix"));
}
