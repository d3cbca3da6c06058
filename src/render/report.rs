// Table layout: which rows each section shows, and the placeholders for missing facts

use super::format;
use super::glyphs::Glyphs;
use super::table::{Row, TableRenderer};
use crate::config::ReportConfig;
use crate::models::{
    CpuSection, DiskSection, Field, MemorySection, NetworkSection, OsSection, SessionSection,
    Snapshot,
};

pub const CLIENT_IP_PLACEHOLDER: &str = "Not connected";
pub const LAST_LOGIN_PLACEHOLDER: &str = "Unknown";

pub fn render_table(snapshot: &Snapshot, config: &ReportConfig) -> String {
    let renderer = TableRenderer::new(Glyphs::for_mode(config.mode), config.use_color);
    let sections = [
        os_rows(&snapshot.os),
        network_rows(&snapshot.network, &snapshot.session),
        cpu_rows(&snapshot.cpu),
        disk_rows(&snapshot.disk),
        memory_rows(&snapshot.memory),
        session_rows(&snapshot.session),
    ];

    let mut out = String::new();
    out.push_str(&renderer.top_border());
    out.push_str(&renderer.header_base());
    out.push_str(&renderer.centered(&config.title));
    out.push_str(&renderer.centered(&config.subtitle));
    out.push_str(&renderer.top_divider());
    for (i, section) in sections.iter().filter(|s| !s.is_empty()).enumerate() {
        if i > 0 {
            out.push_str(&renderer.divider());
        }
        for row in section {
            out.push_str(&renderer.row(row));
        }
    }
    out.push_str(&renderer.footer());
    out
}

fn value<T>(field: &Option<Field<T>>) -> Option<&T> {
    field.as_ref().map(|f| &f.value)
}

fn push_text(rows: &mut Vec<Row>, label: &str, field: &Option<Field<String>>) {
    if let Some(v) = value(field) {
        rows.push(Row::text(label, v.as_str()));
    }
}

fn os_rows(os: &OsSection) -> Vec<Row> {
    let mut rows = Vec::new();
    if let Some(name) = value(&os.name) {
        let label = match value(&os.version) {
            Some(version) => format!("{name} {version}"),
            None => name.clone(),
        };
        rows.push(Row::text("OS", label));
    }
    push_text(&mut rows, "KERNEL", &os.kernel);
    push_text(&mut rows, "ARCH", &os.architecture);
    rows
}

fn network_rows(network: &NetworkSection, session: &SessionSection) -> Vec<Row> {
    let mut rows = Vec::new();
    push_text(&mut rows, "HOSTNAME", &network.hostname);
    push_text(&mut rows, "MACHINE IP", &network.machine_ip);
    let client = value(&network.client_ip).map_or(CLIENT_IP_PLACEHOLDER, String::as_str);
    rows.push(Row::text("CLIENT  IP", client));
    if let Some(servers) = value(&network.dns_servers) {
        for (i, server) in servers.iter().enumerate() {
            rows.push(Row::text(format!("DNS  IP {}", i + 1), server.as_str()));
        }
    }
    push_text(&mut rows, "USER", &session.username);
    rows
}

/// One `GPU` row, `GPU n` rows for two or three, a single joined `GPUs` row beyond that.
pub fn gpu_rows(gpus: &[String]) -> Vec<Row> {
    match gpus {
        [] => Vec::new(),
        [only] => vec![Row::text("GPU", only.as_str())],
        few if few.len() <= 3 => few
            .iter()
            .enumerate()
            .map(|(i, gpu)| Row::text(format!("GPU {}", i + 1), gpu.as_str()))
            .collect(),
        many => vec![Row::text("GPUs", many.join(", "))],
    }
}

fn cpu_rows(cpu: &CpuSection) -> Vec<Row> {
    let mut rows = Vec::new();
    push_text(&mut rows, "PROCESSOR", &cpu.processor);
    if let Some(logical) = value(&cpu.logical_cores) {
        rows.push(Row::text(
            "CORES",
            format::cores(*logical, value(&cpu.sockets).copied()),
        ));
    }
    if let Some(gpus) = value(&cpu.gpus) {
        rows.extend(gpu_rows(gpus));
    }
    push_text(&mut rows, "HYPERVISOR", &cpu.hypervisor);
    if let Some(mhz) = value(&cpu.frequency_mhz) {
        rows.push(Row::text("CPU FREQ", format::frequency(*mhz)));
    }
    for (label, load) in [
        ("LOAD  1m", &cpu.load_1m),
        ("LOAD  5m", &cpu.load_5m),
        ("LOAD 15m", &cpu.load_15m),
    ] {
        if let Some(pct) = value(load) {
            rows.push(Row::bar(label, *pct));
        }
    }
    rows
}

fn disk_rows(disk: &DiskSection) -> Vec<Row> {
    let mut rows = Vec::new();
    if let (Some(used), Some(total), Some(pct)) = (
        value(&disk.used_bytes),
        value(&disk.total_bytes),
        value(&disk.percent),
    ) {
        rows.push(Row::text("VOLUME", format::disk_usage(*used, *total, *pct)));
        rows.push(Row::bar("DISK USAGE", f64::from(*pct)));
    }
    push_text(&mut rows, "ZFS HEALTH", &disk.zfs_health);
    rows
}

fn memory_rows(memory: &MemorySection) -> Vec<Row> {
    let mut rows = Vec::new();
    if let (Some(used), Some(total), Some(pct)) = (
        value(&memory.used_bytes),
        value(&memory.total_bytes),
        value(&memory.percent),
    ) {
        rows.push(Row::text("MEMORY", format::memory_usage(*used, *total, *pct)));
        rows.push(Row::bar("USAGE", *pct));
    }
    rows
}

fn session_rows(session: &SessionSection) -> Vec<Row> {
    let mut rows = Vec::new();
    let login = value(&session.last_login).map_or(LAST_LOGIN_PLACEHOLDER, String::as_str);
    rows.push(Row::text("LAST LOGIN", login));
    if let Some(ip) = value(&session.last_login_ip) {
        rows.push(Row::text("", ip.as_str()));
    }
    if let Some(seconds) = value(&session.uptime_seconds) {
        rows.push(Row::text("UPTIME", format::uptime(*seconds)));
    }
    push_text(&mut rows, "SHELL", &session.shell);
    push_text(&mut rows, "TERMINAL", &session.terminal);
    push_text(&mut rows, "LOCALE", &session.locale);
    push_text(&mut rows, "BATTERY", &session.battery);
    rows
}
