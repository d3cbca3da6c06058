// Disk collector: mounted volumes plus ZFS pool status when a ZFS volume is present

use crate::host::Host;
use crate::models::{DiskFacts, Volume, ZfsPool};
use crate::platform::Platform;
use crate::policy::{FastModePolicy, FieldKey};
use crate::provider::{Probe, ProviderChain, parse};

pub async fn collect<H: Host>(host: &H, policy: &FastModePolicy) -> DiskFacts {
    let platform = host.platform();
    let native = host.volumes().await;

    let chain = ProviderChain::new(FieldKey::Volumes).ready("sysinfo", Some(native).filter(|v| !v.is_empty()));
    let chain = if platform.is_unix() {
        chain.probe("df", Probe::command("df", &["-kP"]), parse_df)
    } else {
        chain
    };
    let volumes = chain.resolve(host, policy).await.found();

    let has_zfs = volumes
        .as_ref()
        .is_some_and(|v| v.value.iter().any(Volume::is_zfs));
    let zfs_pools = if has_zfs {
        ProviderChain::new(FieldKey::ZfsPools)
            .probe(
                "zpool-list",
                Probe::command("zpool", &["list", "-H", "-p", "-o", "name,size,alloc,health"]),
                parse_zpool_list,
            )
            .resolve(host, policy)
            .await
            .found()
    } else {
        None
    };

    DiskFacts {
        os_root: os_root(host, platform),
        volumes,
        zfs_pools,
    }
}

fn os_root<H: Host>(host: &H, platform: Platform) -> String {
    if platform != Platform::Windows {
        return "/".to_string();
    }
    let drive = host
        .env_var("SystemDrive")
        .unwrap_or_else(|| "C:".to_string());
    format!("{}\\", drive.trim().trim_end_matches('\\'))
}

/// POSIX `df -kP`: filesystem, 1024-blocks, used, available, capacity, mount point.
pub(crate) fn parse_df(raw: &str) -> Option<Vec<Volume>> {
    let volumes: Vec<Volume> = raw
        .lines()
        .skip(1)
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < 6 {
                return None;
            }
            let total = cols[1].parse::<u64>().ok()? * 1024;
            let used = cols[2].parse::<u64>().ok()? * 1024;
            let available = cols[3].parse::<u64>().ok()? * 1024;
            (total > 0).then(|| Volume {
                name: cols[0].to_string(),
                mount_point: cols[5..].join(" "),
                filesystem: String::new(),
                total_bytes: total,
                used_bytes: used.min(total),
                available_bytes: available.min(total),
                is_removable: false,
            })
        })
        .collect();
    (!volumes.is_empty()).then_some(volumes)
}

/// Tab-separated `name size alloc health`, sizes in bytes (`-p`).
pub(crate) fn parse_zpool_list(raw: &str) -> Option<Vec<ZfsPool>> {
    let pools: Vec<ZfsPool> = raw
        .lines()
        .filter_map(|line| {
            let cols: Vec<&str> = line.split('\t').map(str::trim).collect();
            let [name, size, alloc, health] = cols.as_slice() else {
                return None;
            };
            Some(ZfsPool {
                name: parse::non_empty(name)?,
                size_bytes: size.parse().ok()?,
                allocated_bytes: alloc.parse().ok()?,
                health: parse::non_empty(health)?,
            })
        })
        .collect();
    (!pools.is_empty()).then_some(pools)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn df_keeps_mount_points_with_spaces() {
        let raw = "Filesystem     1024-blocks      Used Available Capacity Mounted on\n\
                   /dev/sda1        102400     51200     51200      50% /\n\
                   /dev/sdb1          2048      1024      1024      50% /media/usb stick\n\
                   tmpfs                 0         0         0       0% /dev/shm\n";
        let volumes = parse_df(raw).expect("volumes");
        assert_eq!(volumes.len(), 2);
        assert_eq!(volumes[0].mount_point, "/");
        assert_eq!(volumes[0].total_bytes, 102400 * 1024);
        assert_eq!(volumes[1].mount_point, "/media/usb stick");
    }

    #[test]
    fn zpool_list_parses_tab_columns() {
        let raw = "rpool\t1000000\t250000\tONLINE\ntank\t5000\t4000\tDEGRADED\n";
        let pools = parse_zpool_list(raw).expect("pools");
        assert_eq!(pools.len(), 2);
        assert_eq!(pools[0].allocated_bytes, 250000);
        assert_eq!(pools[1].health, "DEGRADED");
    }

    #[test]
    fn zpool_list_rejects_missing_columns() {
        assert_eq!(parse_zpool_list("rpool 1000 ONLINE\n"), None);
    }
}
