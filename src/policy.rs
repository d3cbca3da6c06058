// Fast-mode policy: a static table of slow fields and strategies skipped per platform.

use crate::platform::Platform;

/// Every fact a provider chain can resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    OsName,
    OsVersion,
    Kernel,
    Architecture,
    Hostname,
    Uptime,
    MachineIp,
    ClientIp,
    DnsServers,
    CpuBrand,
    CpuUsage,
    CpuLoad,
    CpuFrequency,
    CpuSockets,
    Memory,
    Volumes,
    ZfsPools,
    Username,
    LastLogin,
    Shell,
    Terminal,
    Locale,
    Gpus,
    Hypervisor,
    Battery,
    OsEdition,
    BootMode,
    DesktopEnvironment,
    DisplayServer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// The whole field is left unresolved.
    Field,
    /// Only the named strategy is removed from the chain.
    Strategy(&'static str),
}

/// Entries consulted before any strategy is dispatched in fast mode.
pub const FAST_MODE_SKIPS: &[(Platform, FieldKey, Skip)] = &[
    // PowerShell and WMI round-trips dominate Windows run time.
    (Platform::Windows, FieldKey::CpuUsage, Skip::Field),
    (Platform::Windows, FieldKey::CpuLoad, Skip::Field),
    (Platform::Windows, FieldKey::CpuSockets, Skip::Field),
    (Platform::Windows, FieldKey::CpuBrand, Skip::Strategy("win32-processor")),
    (Platform::Windows, FieldKey::Gpus, Skip::Field),
    (Platform::Windows, FieldKey::Hypervisor, Skip::Field),
    (Platform::Windows, FieldKey::LastLogin, Skip::Field),
    (Platform::Windows, FieldKey::Battery, Skip::Field),
    (Platform::Windows, FieldKey::OsEdition, Skip::Field),
    (Platform::Windows, FieldKey::Locale, Skip::Strategy("get-culture")),
    (Platform::Windows, FieldKey::Shell, Skip::Strategy("psversion")),
    (Platform::Windows, FieldKey::OsName, Skip::Strategy("cmd-ver")),
    (Platform::Windows, FieldKey::MachineIp, Skip::Strategy("get-netipaddress")),
    (Platform::Windows, FieldKey::DnsServers, Skip::Strategy("get-dnsclientserveraddress")),
    (Platform::Linux, FieldKey::CpuUsage, Skip::Field),
    (Platform::Linux, FieldKey::CpuSockets, Skip::Field),
    (Platform::Linux, FieldKey::Hypervisor, Skip::Strategy("systemd-detect-virt")),
    (Platform::Linux, FieldKey::Gpus, Skip::Strategy("nvidia-smi")),
    (Platform::MacOs, FieldKey::CpuUsage, Skip::Field),
    (Platform::MacOs, FieldKey::CpuSockets, Skip::Field),
    (Platform::MacOs, FieldKey::Gpus, Skip::Field),
    (Platform::MacOs, FieldKey::Hypervisor, Skip::Strategy("system-profiler")),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FastModePolicy {
    platform: Platform,
    enabled: bool,
}

impl FastModePolicy {
    pub fn new(platform: Platform, enabled: bool) -> Self {
        Self { platform, enabled }
    }

    pub fn disabled(platform: Platform) -> Self {
        Self::new(platform, false)
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn entries(&self, field: FieldKey) -> impl Iterator<Item = Skip> + '_ {
        FAST_MODE_SKIPS
            .iter()
            .filter(move |(platform, key, _)| {
                self.enabled && *platform == self.platform && *key == field
            })
            .map(|(_, _, skip)| *skip)
    }

    pub fn skips_field(&self, field: FieldKey) -> bool {
        self.entries(field).any(|skip| skip == Skip::Field)
    }

    /// Whether `strategy` may run for `field`.
    pub fn allows(&self, field: FieldKey, strategy: &str) -> bool {
        !self.entries(field).any(|skip| match skip {
            Skip::Field => true,
            Skip::Strategy(name) => name == strategy,
        })
    }
}
