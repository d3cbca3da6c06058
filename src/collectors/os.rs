// OS identity collector: name, version, kernel, architecture, hostname, uptime

use crate::host::Host;
use crate::models::OsFacts;
use crate::platform::Platform;
use crate::policy::{FastModePolicy, FieldKey};
use crate::provider::{Probe, ProviderChain, parse};

pub async fn collect<H: Host>(host: &H, policy: &FastModePolicy) -> OsFacts {
    let platform = host.platform();
    let native = host.os_info().await;

    let (name, version, kernel, architecture, hostname, uptime) = tokio::join!(
        name_chain(platform, native.name).resolve(host, policy),
        version_chain(platform, native.version).resolve(host, policy),
        kernel_chain(platform, native.kernel).resolve(host, policy),
        ProviderChain::new(FieldKey::Architecture)
            .ready("sysinfo", native.architecture)
            .resolve(host, policy),
        hostname_chain(platform, native.hostname).resolve(host, policy),
        uptime_chain(platform, native.uptime_seconds).resolve(host, policy),
    );

    OsFacts {
        name: name.found(),
        version: version.found(),
        kernel: kernel.found(),
        architecture: architecture.found(),
        hostname: hostname.found(),
        uptime_seconds: uptime.found(),
    }
}

fn name_chain(platform: Platform, native: Option<String>) -> ProviderChain<String> {
    let chain = ProviderChain::new(FieldKey::OsName).ready("sysinfo", native);
    match platform {
        Platform::Linux => chain.probe("os-release", Probe::file("/etc/os-release"), |raw| {
            os_release_value(raw, "NAME")
        }),
        Platform::MacOs => chain.probe(
            "sw-vers",
            Probe::command("sw_vers", &["-productName"]),
            parse::first_line,
        ),
        Platform::Windows => chain.probe("cmd-ver", Probe::command("cmd", &["/c", "ver"]), |raw| {
            raw.contains("Windows").then(|| "Windows".to_string())
        }),
        Platform::Other => chain,
    }
}

fn version_chain(platform: Platform, native: Option<String>) -> ProviderChain<String> {
    let chain = ProviderChain::new(FieldKey::OsVersion).ready("sysinfo", native);
    match platform {
        Platform::Linux => chain.probe("os-release", Probe::file("/etc/os-release"), |raw| {
            os_release_value(raw, "VERSION_ID")
        }),
        Platform::MacOs => chain.probe(
            "sw-vers",
            Probe::command("sw_vers", &["-productVersion"]),
            parse::first_line,
        ),
        Platform::Windows => chain.probe(
            "cmd-ver",
            Probe::command("cmd", &["/c", "ver"]),
            parse_windows_ver,
        ),
        Platform::Other => chain,
    }
}

fn kernel_chain(platform: Platform, native: Option<String>) -> ProviderChain<String> {
    let chain = ProviderChain::new(FieldKey::Kernel).ready("sysinfo", native);
    match platform {
        Platform::Linux | Platform::MacOs => {
            chain.probe("uname", Probe::command("uname", &["-r"]), parse::first_line)
        }
        Platform::Windows => chain.probe(
            "cmd-ver",
            Probe::command("cmd", &["/c", "ver"]),
            parse_windows_ver,
        ),
        Platform::Other => chain,
    }
}

fn hostname_chain(platform: Platform, native: Option<String>) -> ProviderChain<String> {
    let chain = ProviderChain::new(FieldKey::Hostname).ready("sysinfo", native);
    let chain = if platform == Platform::Windows {
        chain.probe("env-computername", Probe::env("COMPUTERNAME"), parse::non_empty)
    } else {
        chain.probe("env-hostname", Probe::env("HOSTNAME"), parse::non_empty)
    };
    chain.probe("hostname", Probe::command("hostname", &[]), parse::first_line)
}

fn uptime_chain(platform: Platform, native: Option<u64>) -> ProviderChain<u64> {
    let chain = ProviderChain::new(FieldKey::Uptime).ready("sysinfo", native);
    match platform {
        Platform::Linux => chain.probe("proc-uptime", Probe::file("/proc/uptime"), parse_proc_uptime),
        _ => chain,
    }
}

/// Unquoted value of `KEY=` in an os-release file.
pub(crate) fn os_release_value(content: &str, key: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let value = line.strip_prefix(key)?.strip_prefix('=')?;
        parse::non_empty(value.trim().trim_matches('"').trim_matches('\''))
    })
}

/// `Microsoft Windows [Version 10.0.22631.4037]` -> `10.0.22631.4037`.
fn parse_windows_ver(raw: &str) -> Option<String> {
    let start = raw.find("[Version ")? + "[Version ".len();
    let rest = &raw[start..];
    let end = rest.find(']')?;
    parse::non_empty(&rest[..end])
}

fn parse_proc_uptime(raw: &str) -> Option<u64> {
    let seconds: f64 = raw.split_whitespace().next()?.parse().ok()?;
    (seconds.is_finite() && seconds > 0.0).then_some(seconds as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OS_RELEASE: &str = r#"PRETTY_NAME="Ubuntu 24.04.1 LTS"
NAME="Ubuntu"
VERSION_ID="24.04"
ID=ubuntu
"#;

    #[test]
    fn os_release_reads_exact_keys() {
        assert_eq!(os_release_value(OS_RELEASE, "NAME"), Some("Ubuntu".into()));
        assert_eq!(os_release_value(OS_RELEASE, "VERSION_ID"), Some("24.04".into()));
        assert_eq!(os_release_value(OS_RELEASE, "BUILD_ID"), None);
    }

    #[test]
    fn windows_ver_extracts_build() {
        let raw = "\r\nMicrosoft Windows [Version 10.0.22631.4037]\r\n";
        assert_eq!(parse_windows_ver(raw), Some("10.0.22631.4037".into()));
        assert_eq!(parse_windows_ver("garbage"), None);
    }

    #[test]
    fn proc_uptime_truncates_seconds() {
        assert_eq!(parse_proc_uptime("35123.82 140000.11\n"), Some(35123));
        assert_eq!(parse_proc_uptime(""), None);
    }

    #[test]
    fn hostname_chain_order() {
        let chain = hostname_chain(Platform::Windows, None);
        assert_eq!(chain.strategy_names(), vec!["sysinfo", "env-computername", "hostname"]);
    }
}
