// Immutable point-in-time report model, grouped into the six rendered sections

use serde::Serialize;

use super::{Field, list_or_empty};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub os: OsSection,
    pub network: NetworkSection,
    pub cpu: CpuSection,
    pub disk: DiskSection,
    pub memory: MemorySection,
    pub session: SessionSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OsSection {
    pub name: Option<Field<String>>,
    pub version: Option<Field<String>>,
    pub kernel: Option<Field<String>>,
    pub architecture: Option<Field<String>>,
    pub edition: Option<Field<String>>,
    pub boot_mode: Option<Field<String>>,
    pub desktop_environment: Option<Field<String>>,
    pub display_server: Option<Field<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkSection {
    pub hostname: Option<Field<String>>,
    pub machine_ip: Option<Field<String>>,
    pub client_ip: Option<Field<String>>,
    #[serde(serialize_with = "list_or_empty")]
    pub dns_servers: Option<Field<Vec<String>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CpuSection {
    pub processor: Option<Field<String>>,
    pub logical_cores: Option<Field<usize>>,
    pub physical_cores: Option<Field<usize>>,
    pub sockets: Option<Field<usize>>,
    pub frequency_mhz: Option<Field<u64>>,
    pub usage_percent: Option<Field<f64>>,
    #[serde(serialize_with = "list_or_empty")]
    pub per_core_percent: Option<Field<Vec<f64>>>,
    pub load_1m: Option<Field<f64>>,
    pub load_5m: Option<Field<f64>>,
    pub load_15m: Option<Field<f64>>,
    #[serde(serialize_with = "list_or_empty")]
    pub gpus: Option<Field<Vec<String>>>,
    pub hypervisor: Option<Field<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiskSection {
    pub mount_point: Option<Field<String>>,
    pub filesystem: Option<Field<String>>,
    pub used_bytes: Option<Field<u64>>,
    pub total_bytes: Option<Field<u64>>,
    pub percent: Option<Field<u8>>,
    pub zfs_health: Option<Field<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemorySection {
    pub used_bytes: Option<Field<u64>>,
    pub total_bytes: Option<Field<u64>>,
    pub available_bytes: Option<Field<u64>>,
    pub swap_used_bytes: Option<Field<u64>>,
    pub swap_total_bytes: Option<Field<u64>>,
    pub percent: Option<Field<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSection {
    pub username: Option<Field<String>>,
    pub last_login: Option<Field<String>>,
    pub last_login_ip: Option<Field<String>>,
    pub uptime_seconds: Option<Field<u64>>,
    pub shell: Option<Field<String>>,
    pub terminal: Option<Field<String>>,
    pub locale: Option<Field<String>>,
    pub battery: Option<Field<String>>,
}
