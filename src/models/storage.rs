// Volume and ZFS pool facts

use super::Field;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Volume {
    pub name: String,
    pub mount_point: String,
    pub filesystem: String,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
    pub is_removable: bool,
}

impl Volume {
    pub fn is_zfs(&self) -> bool {
        self.filesystem.eq_ignore_ascii_case("zfs")
    }

    /// Pool part of a ZFS dataset name (`rpool/ROOT/ubuntu` -> `rpool`).
    pub fn zfs_pool(&self) -> Option<&str> {
        if !self.is_zfs() {
            return None;
        }
        self.name.split('/').next().filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZfsPool {
    pub name: String,
    pub size_bytes: u64,
    pub allocated_bytes: u64,
    pub health: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiskFacts {
    /// Mount point of the running OS (`/`, or the system drive on Windows).
    pub os_root: String,
    pub volumes: Option<Field<Vec<Volume>>>,
    pub zfs_pools: Option<Field<Vec<ZfsPool>>>,
}
