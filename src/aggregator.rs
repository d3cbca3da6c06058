// Merges collector outputs into one Snapshot and applies cross-domain derivations.

use crate::collectors::CollectorOutput;
use crate::models::*;

pub const BARE_METAL: &str = "Bare Metal";

/// Collector outputs keyed by domain; filling order does not matter.
#[derive(Debug, Default)]
struct Gathered {
    os: OsFacts,
    cpu: CpuFacts,
    memory: MemoryFacts,
    disk: DiskFacts,
    network: NetworkFacts,
    session: SessionFacts,
    extras: PlatformExtras,
}

impl Gathered {
    fn absorb(&mut self, output: CollectorOutput) {
        match output {
            CollectorOutput::Os(facts) => self.os = facts,
            CollectorOutput::Cpu(facts) => self.cpu = facts,
            CollectorOutput::Memory(facts) => self.memory = facts,
            CollectorOutput::Disk(facts) => self.disk = facts,
            CollectorOutput::Network(facts) => self.network = facts,
            CollectorOutput::Session(facts) => self.session = facts,
            CollectorOutput::Extras(facts) => self.extras = facts,
        }
    }
}

/// Total over any subset of outputs; each domain is expected at most once.
pub fn aggregate(outputs: impl IntoIterator<Item = CollectorOutput>) -> Snapshot {
    let mut gathered = Gathered::default();
    for output in outputs {
        gathered.absorb(output);
    }
    let Gathered {
        os,
        cpu,
        memory,
        disk,
        network,
        session,
        extras,
    } = gathered;

    let hypervisor = hypervisor_label(&extras.virtualization);
    let (load_1m, load_5m, load_15m) = split_load(cpu.load_percent);

    Snapshot {
        os: OsSection {
            name: os.name,
            version: os.version,
            kernel: os.kernel,
            architecture: os.architecture,
            edition: extras.edition,
            boot_mode: extras.boot_mode,
            desktop_environment: extras.desktop_environment,
            display_server: extras.display_server,
        },
        network: NetworkSection {
            hostname: os.hostname,
            machine_ip: network.machine_ip,
            client_ip: network.client_ip,
            dns_servers: network.dns_servers,
        },
        cpu: CpuSection {
            processor: cpu.processor,
            logical_cores: cpu.logical_cores,
            physical_cores: cpu.physical_cores,
            sockets: cpu.sockets,
            frequency_mhz: cpu.frequency_mhz,
            usage_percent: cpu.usage_percent.map(|f| f.map(round2)),
            per_core_percent: cpu
                .per_core_percent
                .map(|f| f.map(|cores| cores.into_iter().map(round2).collect())),
            load_1m,
            load_5m,
            load_15m,
            gpus: extras.gpus,
            hypervisor,
        },
        disk: disk_section(&disk),
        memory: memory_section(memory.usage),
        session: SessionSection {
            username: session.username,
            last_login_ip: session
                .last_login
                .as_ref()
                .and_then(|f| f.value.from.clone().map(|ip| Field::new(ip, f.source))),
            last_login: session.last_login.map(|f| f.map(|login| login.when)),
            uptime_seconds: os.uptime_seconds,
            shell: session.shell,
            terminal: session.terminal,
            locale: session.locale,
            battery: extras.battery,
        },
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Captured vendor verbatim, "Bare Metal" when every signal came back empty.
pub fn hypervisor_label(virtualization: &Outcome<String>) -> Option<Field<String>> {
    match virtualization {
        Outcome::Found(field) => Some(field.clone()),
        Outcome::Exhausted => Some(Field::new(BARE_METAL.to_string(), "default")),
        Outcome::Skipped => None,
    }
}

type LoadFields = (Option<Field<f64>>, Option<Field<f64>>, Option<Field<f64>>);

fn split_load(load: Option<Field<LoadAverage>>) -> LoadFields {
    match load {
        Some(Field { value, source }) => (
            Some(Field::new(round2(value.one), source)),
            Some(Field::new(round2(value.five), source)),
            Some(Field::new(round2(value.fifteen), source)),
        ),
        None => (None, None, None),
    }
}

/// Integer percent rounded to nearest, clamped to [0, 100].
pub fn usage_percent(used: u64, total: u64) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let pct = (used as f64 / total as f64 * 100.0).round().clamp(0.0, 100.0);
    Some(pct as u8)
}

fn same_mount(mount: &str, root: &str) -> bool {
    fn normalize(m: &str) -> String {
        let trimmed = m.trim().trim_end_matches(['/', '\\']);
        if trimmed.is_empty() {
            "/".to_string()
        } else {
            trimmed.to_ascii_lowercase()
        }
    }
    normalize(mount) == normalize(root)
}

/// Disk figures chosen from the reported volumes.
#[derive(Debug, Clone, PartialEq)]
pub struct DiskSelection {
    pub mount_point: Option<String>,
    pub filesystem: Option<String>,
    pub used_bytes: u64,
    pub total_bytes: u64,
    pub source: &'static str,
}

impl DiskSelection {
    fn single(volume: &Volume, source: &'static str) -> Self {
        Self {
            mount_point: Some(volume.mount_point.clone()),
            filesystem: Some(volume.filesystem.clone()).filter(|f| !f.is_empty()),
            used_bytes: volume.used_bytes,
            total_bytes: volume.total_bytes,
            source,
        }
    }
}

/// OS root volume, else the sum of non-removable volumes, else the first volume.
pub fn select_disk(volumes: &[Volume], os_root: &str) -> Option<DiskSelection> {
    if let Some(root) = volumes.iter().find(|v| same_mount(&v.mount_point, os_root)) {
        return Some(DiskSelection::single(root, "root-volume"));
    }
    let fixed = volumes.iter().filter(|v| !v.is_removable);
    let (used, total) = fixed.fold((0u64, 0u64), |(used, total), v| {
        (used.saturating_add(v.used_bytes), total.saturating_add(v.total_bytes))
    });
    if total > 0 {
        return Some(DiskSelection {
            mount_point: None,
            filesystem: None,
            used_bytes: used,
            total_bytes: total,
            source: "non-removable-sum",
        });
    }
    volumes.first().map(|v| DiskSelection::single(v, "first-volume"))
}

fn disk_section(disk: &DiskFacts) -> DiskSection {
    let volumes = disk.volumes.as_ref().map(|f| f.value.as_slice()).unwrap_or_default();
    let pools = disk.zfs_pools.as_ref().map(|f| f.value.as_slice()).unwrap_or_default();

    let root_volume = volumes.iter().find(|v| same_mount(&v.mount_point, &disk.os_root));
    let root_pool = root_volume
        .and_then(Volume::zfs_pool)
        .and_then(|name| pools.iter().find(|p| p.name == name));

    let Some(mut selection) = select_disk(volumes, &disk.os_root) else {
        return DiskSection {
            zfs_health: pools.first().map(|p| Field::new(p.health.clone(), "zpool-list")),
            ..DiskSection::default()
        };
    };

    // Dataset sizes on ZFS hide the pool's real capacity.
    if let Some(pool) = root_pool
        && selection.source == "root-volume"
        && pool.size_bytes > 0
    {
        selection.used_bytes = pool.allocated_bytes.min(pool.size_bytes);
        selection.total_bytes = pool.size_bytes;
        selection.source = "zpool-list";
    }

    let health = root_pool
        .or_else(|| pools.first())
        .map(|p| Field::new(p.health.clone(), "zpool-list"));
    let source = selection.source;

    DiskSection {
        mount_point: selection.mount_point.map(|m| Field::new(m, source)),
        filesystem: selection.filesystem.map(|f| Field::new(f, source)),
        used_bytes: Some(Field::new(selection.used_bytes, source)),
        total_bytes: Some(Field::new(selection.total_bytes, source)),
        percent: usage_percent(selection.used_bytes, selection.total_bytes)
            .map(|p| Field::new(p, source)),
        zfs_health: health,
    }
}

fn memory_section(usage: Option<Field<MemoryUsage>>) -> MemorySection {
    let Some(Field { value: m, source }) = usage else {
        return MemorySection::default();
    };
    let percent = (m.total_bytes > 0).then(|| {
        let pct = m.used_bytes as f64 / m.total_bytes as f64 * 100.0;
        Field::new(round2(pct.clamp(0.0, 100.0)), source)
    });
    MemorySection {
        used_bytes: Some(Field::new(m.used_bytes, source)),
        total_bytes: Some(Field::new(m.total_bytes, source)),
        available_bytes: Some(Field::new(m.available_bytes, source)),
        swap_used_bytes: Some(Field::new(m.swap_used_bytes, source)),
        swap_total_bytes: Some(Field::new(m.swap_total_bytes, source)),
        percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volume(mount: &str, total: u64, used: u64, removable: bool) -> Volume {
        Volume {
            name: mount.to_string(),
            mount_point: mount.to_string(),
            filesystem: "ext4".to_string(),
            total_bytes: total,
            used_bytes: used,
            available_bytes: total - used,
            is_removable: removable,
        }
    }

    #[test]
    fn percent_rounds_and_clamps() {
        assert_eq!(usage_percent(0, 0), None);
        assert_eq!(usage_percent(1, 3), Some(33));
        assert_eq!(usage_percent(2, 3), Some(67));
        assert_eq!(usage_percent(5, 4), Some(100));
    }

    #[test]
    fn windows_system_drive_matches_case_insensitively() {
        let volumes = vec![volume("D:\\", 100, 10, false), volume("c:\\", 200, 50, false)];
        let selection = select_disk(&volumes, "C:\\").expect("selection");
        assert_eq!(selection.total_bytes, 200);
        assert_eq!(selection.source, "root-volume");
    }

    #[test]
    fn sum_of_fixed_volumes_without_root() {
        let volumes = vec![
            volume("/data", 100, 10, false),
            volume("/media/usb", 50, 50, true),
            volume("/srv", 300, 30, false),
        ];
        let selection = select_disk(&volumes, "/").expect("selection");
        assert_eq!((selection.used_bytes, selection.total_bytes), (40, 400));
        assert_eq!(selection.mount_point, None);
    }

    #[test]
    fn first_volume_when_only_removable() {
        let volumes = vec![volume("/media/a", 10, 5, true), volume("/media/b", 20, 5, true)];
        let selection = select_disk(&volumes, "/").expect("selection");
        assert_eq!(selection.mount_point.as_deref(), Some("/media/a"));
        assert_eq!(selection.source, "first-volume");
    }

    #[test]
    fn hypervisor_label_depends_on_outcome() {
        assert_eq!(
            hypervisor_label(&Outcome::Exhausted).map(|f| f.value),
            Some(BARE_METAL.to_string())
        );
        assert_eq!(hypervisor_label(&Outcome::Skipped), None);
        let found = Outcome::Found(Field::new("QEMU".to_string(), "dmi-sys-vendor"));
        assert_eq!(hypervisor_label(&found).map(|f| f.value), Some("QEMU".into()));
    }
}
