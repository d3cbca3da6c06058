// CPU collector: brand, cores, sockets, frequency, usage and load

use std::time::Duration;

use crate::host::Host;
use crate::models::{CpuFacts, Field, LoadAverage};
use crate::platform::Platform;
use crate::policy::{FastModePolicy, FieldKey};
use crate::provider::{Probe, ProviderChain, parse};

/// Windows has no load average; the measured usage stands in for all three windows.
const USAGE_AS_LOAD: &str = "cpu-usage";

pub async fn collect<H: Host>(
    host: &H,
    policy: &FastModePolicy,
    sample_interval: Duration,
) -> CpuFacts {
    let platform = host.platform();
    let interval = sampling_chain(sample_interval)
        .resolve(host, policy)
        .await
        .found()
        .map(|f| f.value);

    // The sampling sleep overlaps the sockets query.
    let (sample, sockets) = tokio::join!(
        host.cpu_sample(interval),
        sockets_chain(platform).resolve(host, policy),
    );
    let sample = sample.unwrap_or_default();
    let logical_cores = sample.logical_cores;

    let usage_percent = sample
        .usage_percent
        .map(|u| Field::new(u.clamp(0.0, 100.0), "sysinfo-sample"));
    let usage_load = usage_percent.as_ref().map(|u| LoadAverage::flat(u.value));

    let (processor, frequency, load) = tokio::join!(
        brand_chain(platform, sample.brand).resolve(host, policy),
        frequency_chain(platform, sample.frequency_mhz).resolve(host, policy),
        load_chain(platform, sample.load_average, usage_load).resolve(host, policy),
    );

    let load_percent = load.found().map(|f| {
        if f.source == USAGE_AS_LOAD {
            f
        } else {
            f.map(|load| load.as_percent_of(logical_cores))
        }
    });

    CpuFacts {
        processor: processor.found(),
        logical_cores: (logical_cores > 0).then(|| Field::new(logical_cores, "sysinfo")),
        physical_cores: sample.physical_cores.map(|n| Field::new(n, "sysinfo")),
        sockets: sockets.or_default(1, "default"),
        frequency_mhz: frequency.found(),
        usage_percent,
        per_core_percent: (!sample.per_core_percent.is_empty())
            .then(|| Field::new(sample.per_core_percent, "sysinfo-sample")),
        load_percent,
    }
}

/// Resolves to the sampling delay; absent when fast mode drops usage, so only one sample is taken.
fn sampling_chain(interval: Duration) -> ProviderChain<Duration> {
    ProviderChain::new(FieldKey::CpuUsage).ready("sysinfo-sample", Some(interval))
}

fn brand_chain(platform: Platform, native: Option<String>) -> ProviderChain<String> {
    let chain = ProviderChain::new(FieldKey::CpuBrand);
    match platform {
        // /proc/cpuinfo beats sysinfo on ARM boards where the brand comes back as "cpu0".
        Platform::Linux => chain
            .probe("proc-cpuinfo", Probe::file("/proc/cpuinfo"), parse_cpuinfo_model)
            .ready("sysinfo", native),
        Platform::MacOs => chain.ready("sysinfo", native).probe(
            "sysctl-brand-string",
            Probe::command("sysctl", &["-n", "machdep.cpu.brand_string"]),
            parse::first_line,
        ),
        Platform::Windows => chain.ready("sysinfo", native).probe(
            "win32-processor",
            Probe::powershell("(Get-CimInstance Win32_Processor | Select-Object -First 1).Name"),
            parse::first_line,
        ),
        Platform::Other => chain.ready("sysinfo", native),
    }
}

fn sockets_chain(platform: Platform) -> ProviderChain<usize> {
    let chain = ProviderChain::new(FieldKey::CpuSockets);
    match platform {
        Platform::Linux => chain.probe("lscpu", Probe::command("lscpu", &[]), parse_lscpu_sockets),
        Platform::MacOs => chain.probe(
            "sysctl-packages",
            Probe::command("sysctl", &["-n", "hw.packages"]),
            parse_count,
        ),
        Platform::Windows => chain.probe(
            "win32-processor-count",
            Probe::powershell("(Get-CimInstance Win32_Processor | Measure-Object).Count"),
            parse_count,
        ),
        Platform::Other => chain,
    }
}

fn frequency_chain(platform: Platform, native: Option<u64>) -> ProviderChain<u64> {
    let chain = ProviderChain::new(FieldKey::CpuFrequency).ready("sysinfo", native);
    match platform {
        Platform::Linux => chain.probe("proc-cpuinfo", Probe::file("/proc/cpuinfo"), parse_cpuinfo_mhz),
        Platform::MacOs => chain.probe(
            "sysctl-cpufrequency",
            Probe::command("sysctl", &["-n", "hw.cpufrequency"]),
            |raw| parse::number::<u64>(raw).map(|hz| hz / 1_000_000).filter(|mhz| *mhz > 0),
        ),
        Platform::Windows | Platform::Other => chain,
    }
}

fn load_chain(
    platform: Platform,
    native: Option<LoadAverage>,
    usage: Option<LoadAverage>,
) -> ProviderChain<LoadAverage> {
    let chain = ProviderChain::new(FieldKey::CpuLoad);
    match platform {
        Platform::Linux => chain
            .probe("proc-loadavg", Probe::file("/proc/loadavg"), parse_loadavg)
            .ready("getloadavg", native),
        Platform::MacOs => chain.ready("getloadavg", native).probe(
            "sysctl-loadavg",
            Probe::command("sysctl", &["-n", "vm.loadavg"]),
            parse_loadavg,
        ),
        Platform::Windows => chain.ready(USAGE_AS_LOAD, usage),
        Platform::Other => chain,
    }
}

pub(crate) fn parse_cpuinfo_model(raw: &str) -> Option<String> {
    raw.lines()
        .filter(|line| line.starts_with("model name") || line.starts_with("Model"))
        .find_map(|line| {
            let (_, value) = line.split_once(':')?;
            parse::non_empty(value).filter(|v| v != "cpu0")
        })
}

fn parse_cpuinfo_mhz(raw: &str) -> Option<u64> {
    let mhz: f64 = parse::key_value(raw, "cpu MHz", ':')?.parse().ok()?;
    (mhz.is_finite() && mhz > 0.0).then_some(mhz.round() as u64)
}

fn parse_lscpu_sockets(raw: &str) -> Option<usize> {
    parse::key_value(raw, "Socket(s)", ':')
        .and_then(parse::number::<usize>)
        .filter(|n| *n > 0)
}

fn parse_count(raw: &str) -> Option<usize> {
    parse::number::<usize>(raw).filter(|n| *n > 0)
}

/// `/proc/loadavg` (`0.52 0.58 0.59 1/1024 4242`) or `sysctl vm.loadavg` (`{ 1.23 1.45 1.67 }`).
fn parse_loadavg(raw: &str) -> Option<LoadAverage> {
    let mut values = raw
        .split_whitespace()
        .filter(|t| *t != "{" && *t != "}")
        .map(|t| t.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0));
    Some(LoadAverage {
        one: values.next()??,
        five: values.next()??,
        fifteen: values.next()??,
    })
}
