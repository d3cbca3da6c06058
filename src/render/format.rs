// Human formatting for table cells

const GB: f64 = 1_000_000_000.0;
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// `used/total GB [p%]`
pub fn disk_usage(used: u64, total: u64, percent: u8) -> String {
    format!(
        "{:.2}/{:.2} GB [{percent}%]",
        used as f64 / GB,
        total as f64 / GB
    )
}

/// `used/total GiB [p%]`
pub fn memory_usage(used: u64, total: u64, percent: f64) -> String {
    format!(
        "{:.2}/{:.2} GiB [{percent:.1}%]",
        used as f64 / GIB,
        total as f64 / GIB
    )
}

/// `3d 4h 12m`, leading zero units dropped.
pub fn uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

pub fn cores(logical: usize, sockets: Option<usize>) -> String {
    match sockets {
        Some(sockets) => format!("{logical} vCPU(s) / {sockets} Socket(s)"),
        None => format!("{logical} vCPU(s)"),
    }
}

pub fn frequency(mhz: u64) -> String {
    format!("{:.1} GHz", mhz as f64 / 1000.0)
}
