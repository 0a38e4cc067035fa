// Domain models (snapshot wire shapes)

mod container;
mod metric;
mod snapshot;
mod system;

pub use container::{ContainerGroup, ContainerRecord, PortMapping};
pub use metric::{CollectError, MetricResult};
pub use snapshot::{DockerSection, Snapshot, SystemSection};
pub use system::{
    CpuStats, DiskStats, InterfaceStat, MemoryStats, NetworkReport, PortRecord, PortsReport,
    UptimeStats, round1,
};
