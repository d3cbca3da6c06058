// Shared test helpers: a scripted Host and snapshot builders

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use tr300::config::{OutputMode, ReportConfig};
use tr300::error::ProbeError;
use tr300::host::Host;
use tr300::models::*;
use tr300::platform::Platform;

#[derive(Debug, Clone)]
enum Reply {
    Stdout(String),
    Timeout,
}

/// Answers every host query from canned data. Unknown commands fail to spawn.
#[derive(Debug)]
pub struct FakeHost {
    platform: Platform,
    env: HashMap<String, String>,
    files: HashMap<String, String>,
    paths: HashSet<String>,
    commands: Vec<(String, String, Reply)>,
    os: NativeOs,
    memory: Option<MemoryUsage>,
    volumes: Vec<Volume>,
    cpu: Option<CpuSample>,
    calls: Mutex<Vec<String>>,
}

impl FakeHost {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            env: HashMap::new(),
            files: HashMap::new(),
            paths: HashSet::new(),
            commands: Vec::new(),
            os: NativeOs::default(),
            memory: None,
            volumes: Vec::new(),
            cpu: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    pub fn path(mut self, path: &str) -> Self {
        self.paths.insert(path.to_string());
        self
    }

    /// Scripts `program` when its joined arguments contain `args_contain`.
    pub fn command(mut self, program: &str, args_contain: &str, stdout: &str) -> Self {
        self.commands.push((
            program.to_string(),
            args_contain.to_string(),
            Reply::Stdout(stdout.to_string()),
        ));
        self
    }

    pub fn timeout(mut self, program: &str, args_contain: &str) -> Self {
        self.commands
            .push((program.to_string(), args_contain.to_string(), Reply::Timeout));
        self
    }

    pub fn with_os(mut self, os: NativeOs) -> Self {
        self.os = os;
        self
    }

    pub fn with_memory(mut self, memory: MemoryUsage) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn with_volumes(mut self, volumes: Vec<Volume>) -> Self {
        self.volumes = volumes;
        self
    }

    pub fn with_cpu(mut self, cpu: CpuSample) -> Self {
        self.cpu = Some(cpu);
        self
    }

    /// Every command invocation so far, as `program arg arg`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, needle: &str) -> bool {
        self.calls().iter().any(|c| c.contains(needle))
    }
}

impl Host for FakeHost {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn env_var(&self, key: &str) -> Option<String> {
        self.env.get(key).filter(|v| !v.is_empty()).cloned()
    }

    fn read_file(&self, path: &str) -> Result<String, ProbeError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ProbeError::Missing(path.to_string()))
    }

    fn path_exists(&self, path: &str) -> bool {
        self.paths.contains(path) || self.files.contains_key(path)
    }

    async fn run(&self, program: &str, args: &[&str]) -> Result<String, ProbeError> {
        let joined = args.join(" ");
        self.calls
            .lock()
            .unwrap()
            .push(format!("{program} {joined}").trim_end().to_string());
        let reply = self
            .commands
            .iter()
            .find(|(p, needle, _)| p == program && joined.contains(needle.as_str()))
            .map(|(_, _, reply)| reply.clone());
        match reply {
            Some(Reply::Stdout(out)) => Ok(out),
            Some(Reply::Timeout) => Err(ProbeError::Timeout {
                program: program.to_string(),
                timeout_ms: 2000,
            }),
            None => Err(ProbeError::Spawn {
                program: program.to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        }
    }

    async fn os_info(&self) -> NativeOs {
        self.os.clone()
    }

    async fn memory(&self) -> Option<MemoryUsage> {
        self.memory
    }

    async fn volumes(&self) -> Vec<Volume> {
        self.volumes.clone()
    }

    async fn cpu_sample(&self, interval: Option<Duration>) -> Option<CpuSample> {
        let mut sample = self.cpu.clone()?;
        if interval.is_none() {
            sample.usage_percent = None;
            sample.per_core_percent.clear();
        }
        Some(sample)
    }
}

pub fn linux_os() -> NativeOs {
    NativeOs {
        name: Some("Ubuntu".to_string()),
        version: Some("24.04".to_string()),
        kernel: Some("6.8.0-45-generic".to_string()),
        architecture: Some("x86_64".to_string()),
        hostname: Some("devbox".to_string()),
        uptime_seconds: Some(3 * 86_400 + 4 * 3_600 + 12 * 60),
    }
}

pub fn windows_os() -> NativeOs {
    NativeOs {
        name: Some("Windows".to_string()),
        version: Some("11 (26100)".to_string()),
        kernel: Some("26100".to_string()),
        architecture: Some("x86_64".to_string()),
        hostname: Some("WORKSTATION".to_string()),
        uptime_seconds: Some(7_200),
    }
}

pub fn cpu_sample(logical_cores: usize) -> CpuSample {
    CpuSample {
        brand: Some("AMD Ryzen 7 7840U".to_string()),
        logical_cores,
        physical_cores: Some(logical_cores / 2),
        frequency_mhz: Some(3_300),
        usage_percent: Some(12.5),
        per_core_percent: vec![12.5; logical_cores],
        load_average: Some(LoadAverage {
            one: 1.0,
            five: 2.0,
            fifteen: 4.0,
        }),
    }
}

pub fn memory(total_gib: u64, used_gib: u64) -> MemoryUsage {
    const GIB: u64 = 1024 * 1024 * 1024;
    MemoryUsage {
        total_bytes: total_gib * GIB,
        used_bytes: used_gib * GIB,
        available_bytes: (total_gib - used_gib) * GIB,
        swap_total_bytes: 0,
        swap_used_bytes: 0,
    }
}

pub fn volume(mount_point: &str, total: u64, used: u64) -> Volume {
    Volume {
        name: format!("/dev/disk{}", mount_point.len()),
        mount_point: mount_point.to_string(),
        filesystem: "ext4".to_string(),
        total_bytes: total,
        used_bytes: used,
        available_bytes: total - used,
        is_removable: false,
    }
}

/// A Linux host that answers the common probes; tests add the rest.
pub fn linux_host() -> FakeHost {
    FakeHost::new(Platform::Linux)
        .with_os(linux_os())
        .with_cpu(cpu_sample(8))
        .with_memory(memory(16, 8))
        .with_volumes(vec![volume("/", 100_000_000_000, 50_000_000_000)])
        .env("USER", "dev")
        .env("SHELL", "/bin/bash")
        .env("TERM", "xterm-256color")
        .env("LANG", "en_US.UTF-8")
        .command("lscpu", "", "Socket(s):             1\n")
        .command("hostname", "-I", "192.168.1.20 172.17.0.1\n")
        .command("lspci", "-mm", "00:02.0 \"VGA compatible controller\" \"Intel Corporation\" \"Iris Xe Graphics\" -r01 \"Lenovo\" \"Device 22e4\"\n")
        .file("/sys/class/dmi/id/sys_vendor", "LENOVO\n")
        .file("/sys/class/dmi/id/product_name", "ThinkPad X1\n")
        .command("systemd-detect-virt", "", "none\n")
        .file("/proc/cpuinfo", "processor\t: 0\nmodel name\t: AMD Ryzen 7 7840U\nflags\t\t: fpu vme sse2\n")
}

pub fn full_snapshot() -> Snapshot {
    let s = |v: &str| Some(Field::new(v.to_string(), "test"));
    Snapshot {
        os: OsSection {
            name: s("Ubuntu"),
            version: s("24.04"),
            kernel: s("6.8.0-45-generic"),
            architecture: s("x86_64"),
            ..OsSection::default()
        },
        network: NetworkSection {
            hostname: s("devbox"),
            machine_ip: s("192.168.1.20"),
            client_ip: None,
            dns_servers: Some(Field::new(
                vec!["1.1.1.1".to_string(), "192.168.1.1".to_string()],
                "test",
            )),
        },
        cpu: CpuSection {
            processor: s("AMD Ryzen 7 7840U"),
            logical_cores: Some(Field::new(8, "test")),
            sockets: Some(Field::new(1, "test")),
            frequency_mhz: Some(Field::new(3_300, "test")),
            load_1m: Some(Field::new(12.5, "test")),
            load_5m: Some(Field::new(25.0, "test")),
            load_15m: Some(Field::new(50.0, "test")),
            gpus: Some(Field::new(vec!["Iris Xe Graphics".to_string()], "test")),
            hypervisor: s("Bare Metal"),
            ..CpuSection::default()
        },
        disk: DiskSection {
            mount_point: s("/"),
            filesystem: s("ext4"),
            used_bytes: Some(Field::new(50_000_000_000, "test")),
            total_bytes: Some(Field::new(100_000_000_000, "test")),
            percent: Some(Field::new(50, "test")),
            zfs_health: None,
        },
        memory: MemorySection {
            used_bytes: Some(Field::new(8 * 1024 * 1024 * 1024, "test")),
            total_bytes: Some(Field::new(16 * 1024 * 1024 * 1024, "test")),
            percent: Some(Field::new(50.0, "test")),
            ..MemorySection::default()
        },
        session: SessionSection {
            username: s("dev"),
            last_login: s("Mon Oct 19 09:12"),
            last_login_ip: s("10.0.0.5"),
            uptime_seconds: Some(Field::new(3_600, "test")),
            shell: s("bash"),
            terminal: s("xterm-256color"),
            locale: s("en_US.UTF-8"),
            ..SessionSection::default()
        },
    }
}

pub fn table_config(mode: OutputMode) -> ReportConfig {
    ReportConfig::default().with_mode(mode).with_color(false)
}

/// Table lines without the trailing newline.
pub fn lines(report: &str) -> Vec<&str> {
    report.lines().collect()
}
