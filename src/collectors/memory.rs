// Memory collector: physical RAM and swap

use crate::host::Host;
use crate::models::{MemoryFacts, MemoryUsage};
use crate::platform::Platform;
use crate::policy::{FastModePolicy, FieldKey};
use crate::provider::{Probe, ProviderChain};

pub async fn collect<H: Host>(host: &H, policy: &FastModePolicy) -> MemoryFacts {
    let native = host.memory().await;
    let chain = ProviderChain::new(FieldKey::Memory).ready("sysinfo", native);
    let chain = match host.platform() {
        Platform::Linux => chain.probe("proc-meminfo", Probe::file("/proc/meminfo"), parse_meminfo),
        _ => chain,
    };
    let usage = chain
        .resolve(host, policy)
        .await
        .found()
        .filter(|f| f.value.total_bytes > 0)
        .map(|f| f.map(normalized));
    MemoryFacts { usage }
}

fn normalized(usage: MemoryUsage) -> MemoryUsage {
    MemoryUsage {
        used_bytes: usage.used_bytes.min(usage.total_bytes),
        available_bytes: usage.available_bytes.min(usage.total_bytes),
        swap_used_bytes: usage.swap_used_bytes.min(usage.swap_total_bytes),
        ..usage
    }
}

fn meminfo_kib(raw: &str, key: &str) -> Option<u64> {
    raw.lines().find_map(|line| {
        let rest = line.strip_prefix(key)?.strip_prefix(':')?;
        rest.split_whitespace().next()?.parse::<u64>().ok()
    })
}

pub(crate) fn parse_meminfo(raw: &str) -> Option<MemoryUsage> {
    let total = meminfo_kib(raw, "MemTotal")? * 1024;
    // Kernels before 3.14 have no MemAvailable.
    let available = match meminfo_kib(raw, "MemAvailable") {
        Some(kib) => kib * 1024,
        None => {
            let free = meminfo_kib(raw, "MemFree")?;
            let buffers = meminfo_kib(raw, "Buffers").unwrap_or(0);
            let cached = meminfo_kib(raw, "Cached").unwrap_or(0);
            (free + buffers + cached) * 1024
        }
    }
    .min(total);
    let swap_total = meminfo_kib(raw, "SwapTotal").unwrap_or(0) * 1024;
    let swap_free = meminfo_kib(raw, "SwapFree").unwrap_or(0) * 1024;
    Some(MemoryUsage {
        total_bytes: total,
        used_bytes: total - available,
        available_bytes: available,
        swap_total_bytes: swap_total,
        swap_used_bytes: swap_total.saturating_sub(swap_free),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meminfo_uses_mem_available() {
        let raw = "MemTotal:       16000000 kB\nMemFree:         1000000 kB\nMemAvailable:    4000000 kB\nSwapTotal:       2000000 kB\nSwapFree:        1500000 kB\n";
        let usage = parse_meminfo(raw).expect("meminfo");
        assert_eq!(usage.total_bytes, 16_000_000 * 1024);
        assert_eq!(usage.used_bytes, 12_000_000 * 1024);
        assert_eq!(usage.swap_used_bytes, 500_000 * 1024);
    }

    #[test]
    fn meminfo_falls_back_to_free_plus_cache() {
        let raw = "MemTotal: 1000 kB\nMemFree: 100 kB\nBuffers: 50 kB\nCached: 250 kB\n";
        let usage = parse_meminfo(raw).expect("meminfo");
        assert_eq!(usage.available_bytes, 400 * 1024);
    }

    #[test]
    fn meminfo_without_total_is_rejected() {
        assert_eq!(parse_meminfo("MemFree: 100 kB\n"), None);
    }
}
