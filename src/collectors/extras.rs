// Platform extras: GPUs, virtualization signal, battery, edition, boot mode, desktop

use crate::host::Host;
use crate::models::PlatformExtras;
use crate::platform::Platform;
use crate::policy::{FastModePolicy, FieldKey};
use crate::provider::{Probe, ProviderChain, parse};

/// Lower-case substrings that only show up in virtual hardware identifiers.
const VM_MARKERS: &[&str] = &[
    "vmware",
    "virtualbox",
    "innotek",
    "qemu",
    "kvm",
    "xen",
    "parallels",
    "bochs",
    "bhyve",
    "virtual machine",
    "virtualmac",
];

pub async fn collect<H: Host>(host: &H, policy: &FastModePolicy) -> PlatformExtras {
    let platform = host.platform();
    let (gpus, virtualization, battery, edition, boot_mode, desktop, display) = tokio::join!(
        gpu_chain(platform).resolve(host, policy),
        hypervisor_chain(platform).resolve(host, policy),
        battery_chain(platform).resolve(host, policy),
        edition_chain(platform).resolve(host, policy),
        boot_mode_chain(platform).resolve(host, policy),
        desktop_chain(platform).resolve(host, policy),
        display_server_chain(platform).resolve(host, policy),
    );

    PlatformExtras {
        gpus: gpus.found(),
        virtualization,
        battery: battery.found(),
        edition: edition.found(),
        boot_mode: match platform {
            Platform::Linux => boot_mode.or_default("Legacy BIOS".to_string(), "default"),
            _ => boot_mode.found(),
        },
        desktop_environment: desktop.found(),
        display_server: display.found(),
    }
}

pub fn gpu_chain(platform: Platform) -> ProviderChain<Vec<String>> {
    let chain = ProviderChain::new(FieldKey::Gpus);
    match platform {
        Platform::Linux => chain
            .probe("lspci", Probe::command("lspci", &["-mm"]), parse_lspci_gpus)
            .probe(
                "nvidia-smi",
                Probe::command("nvidia-smi", &["--query-gpu=name", "--format=csv,noheader"]),
                parse_name_lines,
            ),
        Platform::MacOs => chain.probe(
            "system-profiler",
            Probe::command("system_profiler", &["SPDisplaysDataType"]),
            parse_displays_chipsets,
        ),
        Platform::Windows => chain.probe(
            "win32-videocontroller",
            Probe::powershell("Get-CimInstance Win32_VideoController | Select-Object -ExpandProperty Name"),
            parse_name_lines,
        ),
        Platform::Other => chain,
    }
}

pub fn hypervisor_chain(platform: Platform) -> ProviderChain<String> {
    let chain = ProviderChain::new(FieldKey::Hypervisor);
    match platform {
        Platform::Linux => chain
            .probe("dmi-sys-vendor", Probe::file("/sys/class/dmi/id/sys_vendor"), parse_vm_identifier)
            .probe("dmi-product-name", Probe::file("/sys/class/dmi/id/product_name"), parse_vm_identifier)
            .probe(
                "systemd-detect-virt",
                Probe::command("systemd-detect-virt", &[]),
                |raw| parse::first_line(raw).filter(|v| v != "none"),
            )
            .probe("cpuinfo-flag", Probe::file("/proc/cpuinfo"), parse_cpuinfo_hypervisor_flag),
        Platform::MacOs => chain
            .probe(
                "system-profiler",
                Probe::command("system_profiler", &["SPHardwareDataType"]),
                parse_model_identifier,
            )
            .probe(
                "sysctl-hv-vmm",
                Probe::command("sysctl", &["-n", "kern.hv_vmm_present"]),
                |raw| (raw.trim() == "1").then(|| "Virtual Machine".to_string()),
            ),
        Platform::Windows => chain.probe(
            "win32-computersystem",
            Probe::powershell(
                "$cs = Get-CimInstance Win32_ComputerSystem; \"$($cs.Manufacturer)|$($cs.Model)\"",
            ),
            parse_manufacturer_model,
        ),
        Platform::Other => chain,
    }
}

fn battery_chain(platform: Platform) -> ProviderChain<String> {
    let chain = ProviderChain::new(FieldKey::Battery);
    match platform {
        Platform::Linux => chain
            .probe("bat0", Probe::file("/sys/class/power_supply/BAT0/uevent"), parse_power_supply_uevent)
            .probe("bat1", Probe::file("/sys/class/power_supply/BAT1/uevent"), parse_power_supply_uevent),
        Platform::MacOs => chain.probe("pmset", Probe::command("pmset", &["-g", "batt"]), parse_pmset),
        Platform::Windows => chain.probe(
            "win32-battery",
            Probe::powershell(
                "$b = Get-CimInstance Win32_Battery | Select-Object -First 1; \
                 if ($b) { \"$($b.EstimatedChargeRemaining)|$($b.BatteryStatus)\" }",
            ),
            parse_win32_battery,
        ),
        Platform::Other => chain,
    }
}

fn edition_chain(platform: Platform) -> ProviderChain<String> {
    let chain = ProviderChain::new(FieldKey::OsEdition);
    match platform {
        Platform::MacOs => chain.probe(
            "sw-vers-codename",
            Probe::command("sw_vers", &["-productVersion"]),
            parse_macos_codename,
        ),
        Platform::Windows => chain.probe(
            "win32-operatingsystem",
            Probe::powershell("(Get-CimInstance Win32_OperatingSystem).Caption"),
            parse::first_line,
        ),
        Platform::Linux | Platform::Other => chain,
    }
}

fn boot_mode_chain(platform: Platform) -> ProviderChain<String> {
    let chain = ProviderChain::new(FieldKey::BootMode);
    match platform {
        Platform::Linux => chain.probe("efi-firmware", Probe::exists("/sys/firmware/efi"), |_| {
            Some("UEFI".to_string())
        }),
        Platform::MacOs => chain.probe("uname-m", Probe::command("uname", &["-m"]), |raw| {
            let arch = parse::first_line(raw)?;
            let mode = if arch == "arm64" { "Apple Silicon" } else { "UEFI" };
            Some(mode.to_string())
        }),
        Platform::Windows => chain.probe("env-firmware-type", Probe::env("firmware_type"), |raw| {
            match raw.trim() {
                "UEFI" => Some("UEFI".to_string()),
                "Legacy" => Some("Legacy BIOS".to_string()),
                _ => None,
            }
        }),
        Platform::Other => chain,
    }
}

fn desktop_chain(platform: Platform) -> ProviderChain<String> {
    let chain = ProviderChain::new(FieldKey::DesktopEnvironment);
    if platform != Platform::Linux {
        return chain;
    }
    chain
        .probe("env-xdg-current-desktop", Probe::env("XDG_CURRENT_DESKTOP"), |raw| {
            // `ubuntu:GNOME` lists the most specific name last.
            raw.split(':').next_back().and_then(parse::non_empty)
        })
        .probe("env-desktop-session", Probe::env("DESKTOP_SESSION"), parse::non_empty)
}

fn display_server_chain(platform: Platform) -> ProviderChain<String> {
    let chain = ProviderChain::new(FieldKey::DisplayServer);
    if platform != Platform::Linux {
        return chain;
    }
    chain
        .probe("env-xdg-session-type", Probe::env("XDG_SESSION_TYPE"), |raw| {
            parse::non_empty(raw).filter(|t| t != "tty")
        })
        .probe("env-wayland-display", Probe::env("WAYLAND_DISPLAY"), |_| Some("wayland".to_string()))
        .probe("env-display", Probe::env("DISPLAY"), |_| Some("x11".to_string()))
}

fn is_vm_identifier(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    VM_MARKERS.iter().any(|m| lower.contains(m))
}

/// DMI vendor or product string, verbatim, when it names virtual hardware.
fn parse_vm_identifier(raw: &str) -> Option<String> {
    parse::first_line(raw).filter(|v| is_vm_identifier(v))
}

fn parse_cpuinfo_hypervisor_flag(raw: &str) -> Option<String> {
    raw.lines()
        .filter(|line| line.starts_with("flags"))
        .any(|line| line.split_whitespace().any(|f| f == "hypervisor"))
        .then(|| "Virtual Machine".to_string())
}

fn parse_model_identifier(raw: &str) -> Option<String> {
    parse::key_value(raw, "Model Identifier", ':')
        .filter(|v| is_vm_identifier(v))
        .map(str::to_string)
}

/// `Manufacturer|Model`; the manufacturer is reported when either side names a VM.
fn parse_manufacturer_model(raw: &str) -> Option<String> {
    let line = parse::first_line(raw)?;
    let (manufacturer, model) = line.split_once('|')?;
    (is_vm_identifier(manufacturer) || is_vm_identifier(model))
        .then(|| manufacturer.trim())
        .and_then(parse::non_empty)
}

/// `lspci -mm`: `00:02.0 "VGA compatible controller" "Intel Corporation" "UHD Graphics 620" ...`
pub(crate) fn parse_lspci_gpus(raw: &str) -> Option<Vec<String>> {
    let gpus: Vec<String> = raw
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split('"').collect();
            // fields: [slot, class, " ", vendor, " ", device, ...]
            let class = fields.get(1)?.to_ascii_lowercase();
            if !(class.contains("vga") || class.contains("3d") || class.contains("display")) {
                return None;
            }
            let vendor = short_vendor(fields.get(3)?);
            let device = fields.get(5)?.trim();
            parse::non_empty(&format!("{vendor} {device}"))
        })
        .collect();
    (!gpus.is_empty()).then_some(gpus)
}

fn short_vendor(vendor: &str) -> &str {
    let lower = vendor.to_ascii_lowercase();
    if lower.contains("nvidia") {
        "NVIDIA"
    } else if lower.contains("advanced micro devices") || lower.contains("amd") {
        "AMD"
    } else if lower.contains("intel") {
        "Intel"
    } else {
        vendor.split_whitespace().next().unwrap_or_default()
    }
}

fn parse_name_lines(raw: &str) -> Option<Vec<String>> {
    let names: Vec<String> = raw.lines().filter_map(parse::non_empty).collect();
    (!names.is_empty()).then_some(names)
}

fn parse_displays_chipsets(raw: &str) -> Option<Vec<String>> {
    let names: Vec<String> = raw
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Chipset Model:"))
        .filter_map(parse::non_empty)
        .collect();
    (!names.is_empty()).then_some(names)
}

/// `POWER_SUPPLY_CAPACITY=85` + `POWER_SUPPLY_STATUS=Discharging` -> `85% (Discharging)`.
fn parse_power_supply_uevent(raw: &str) -> Option<String> {
    let capacity = parse::key_value(raw, "POWER_SUPPLY_CAPACITY", '=')?;
    let capacity: u8 = capacity.parse().ok()?;
    Some(match parse::key_value(raw, "POWER_SUPPLY_STATUS", '=') {
        Some(status) => format!("{capacity}% ({status})"),
        None => format!("{capacity}%"),
    })
}

/// `-InternalBattery-0 (id=123)	85%; discharging; 4:10 remaining present: true`
fn parse_pmset(raw: &str) -> Option<String> {
    let line = raw.lines().find(|l| l.contains("InternalBattery"))?;
    let (_, rest) = line.split_once('\t').or_else(|| line.split_once(')'))?;
    let mut parts = rest.split(';').map(str::trim);
    let pct = parts.next().filter(|p| p.ends_with('%'))?;
    Some(match parts.next().filter(|s| !s.is_empty()) {
        Some(state) => format!("{pct} ({state})"),
        None => pct.to_string(),
    })
}

/// `85|2` -> `85% (AC Power)` using Win32_Battery.BatteryStatus codes.
fn parse_win32_battery(raw: &str) -> Option<String> {
    let line = parse::first_line(raw)?;
    let (pct, status) = line.split_once('|')?;
    let pct: u8 = pct.trim().parse().ok()?;
    let status = match status.trim() {
        "1" => "Discharging",
        "2" => "AC Power",
        "3" => "Fully Charged",
        "4" => "Low",
        "5" => "Critical",
        "6" | "7" | "8" | "9" => "Charging",
        "11" => "Partially Charged",
        _ => return Some(format!("{pct}%")),
    };
    Some(format!("{pct}% ({status})"))
}

/// `15.1` -> `macOS Sequoia`
fn parse_macos_codename(raw: &str) -> Option<String> {
    let version = parse::first_line(raw)?;
    let mut parts = version.split('.');
    let major: u32 = parts.next()?.parse().ok()?;
    let minor: u32 = parts.next().and_then(|m| m.parse().ok()).unwrap_or(0);
    let name = match (major, minor) {
        (26, _) => "Tahoe",
        (15, _) => "Sequoia",
        (14, _) => "Sonoma",
        (13, _) => "Ventura",
        (12, _) => "Monterey",
        (11, _) => "Big Sur",
        (10, 15) => "Catalina",
        _ => return None,
    };
    Some(format!("macOS {name}"))
}
