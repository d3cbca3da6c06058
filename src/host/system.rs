// Live host: process environment, local files, bounded commands, and sysinfo queries

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use sysinfo::{Disks, System};
use tokio::process::Command;
use tracing::instrument;

use super::Host;
use crate::error::ProbeError;
use crate::models::{CpuSample, LoadAverage, MemoryUsage, NativeOs, Volume};
use crate::platform::Platform;

pub struct SystemHost {
    platform: Platform,
    command_timeout: Duration,
}

impl SystemHost {
    pub fn new(command_timeout: Duration) -> Self {
        Self {
            platform: Platform::current(),
            command_timeout,
        }
    }
}

/// Runs a sysinfo query off the async workers; a failed join leaves the value absent.
async fn blocking<T, F>(operation: &'static str, f: F) -> Option<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, operation, "sysinfo task join");
            None
        }
    }
}

#[instrument(skip(args), fields(repo = "process", operation = "run"))]
async fn run_command(program: &str, args: &[String], timeout: Duration) -> Result<String, ProbeError> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let output = match tokio::time::timeout(timeout, command.output()).await {
        Ok(result) => result.map_err(|source| ProbeError::Spawn {
            program: program.to_string(),
            source,
        })?,
        // Dropping the output future kills the child.
        Err(_) => {
            return Err(ProbeError::Timeout {
                program: program.to_string(),
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            });
        }
    };

    if !output.status.success() {
        return Err(ProbeError::Exit {
            program: program.to_string(),
            status: output.status.to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn read_cpu(sys: &System, platform: Platform, sampled: bool) -> CpuSample {
    let cpus = sys.cpus();
    let load_average = if platform.is_unix() {
        let load = System::load_average();
        Some(LoadAverage {
            one: load.one,
            five: load.five,
            fifteen: load.fifteen,
        })
    } else {
        None
    };
    CpuSample {
        brand: trimmed(cpus.first().map(|c| c.brand().to_string())),
        logical_cores: cpus.len(),
        physical_cores: System::physical_core_count().filter(|n| *n > 0),
        frequency_mhz: cpus.first().map(|c| c.frequency()).filter(|f| *f > 0),
        usage_percent: sampled.then(|| f64::from(sys.global_cpu_usage()).clamp(0.0, 100.0)),
        per_core_percent: if sampled {
            cpus.iter().map(|c| f64::from(c.cpu_usage())).collect()
        } else {
            Vec::new()
        },
        load_average,
    }
}

impl Host for SystemHost {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn env_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }

    fn read_file(&self, path: &str) -> Result<String, ProbeError> {
        std::fs::read_to_string(path).map_err(|source| ProbeError::Read {
            path: path.to_string(),
            source,
        })
    }

    fn path_exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }

    fn run(
        &self,
        program: &str,
        args: &[&str],
    ) -> impl Future<Output = Result<String, ProbeError>> + Send {
        let program = program.to_string();
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let timeout = self.command_timeout;
        async move { run_command(&program, &args, timeout).await }
    }

    fn os_info(&self) -> impl Future<Output = NativeOs> + Send {
        async {
            blocking("os_info", || NativeOs {
                name: trimmed(System::name()),
                version: trimmed(System::os_version()),
                kernel: trimmed(System::kernel_version()),
                architecture: Some(std::env::consts::ARCH.to_string()),
                hostname: trimmed(System::host_name()),
                uptime_seconds: Some(System::uptime()).filter(|u| *u > 0),
            })
            .await
            .unwrap_or_default()
        }
    }

    fn memory(&self) -> impl Future<Output = Option<MemoryUsage>> + Send {
        async {
            blocking("memory", || {
                let mut sys = System::new();
                sys.refresh_memory();
                let total = sys.total_memory();
                if total == 0 {
                    return None;
                }
                let available = sys.available_memory().min(total);
                Some(MemoryUsage {
                    total_bytes: total,
                    used_bytes: total - available,
                    available_bytes: available,
                    swap_total_bytes: sys.total_swap(),
                    swap_used_bytes: sys.used_swap(),
                })
            })
            .await
            .flatten()
        }
    }

    fn volumes(&self) -> impl Future<Output = Vec<Volume>> + Send {
        async {
            blocking("volumes", || {
                let disks = Disks::new_with_refreshed_list();
                disks
                    .list()
                    .iter()
                    .filter(|d| d.total_space() > 0)
                    .map(|d| {
                        let total = d.total_space();
                        let available = d.available_space().min(total);
                        Volume {
                            name: d.name().to_string_lossy().into_owned(),
                            mount_point: d.mount_point().to_string_lossy().into_owned(),
                            filesystem: d.file_system().to_string_lossy().into_owned(),
                            total_bytes: total,
                            used_bytes: total - available,
                            available_bytes: available,
                            is_removable: d.is_removable(),
                        }
                    })
                    .collect()
            })
            .await
            .unwrap_or_default()
        }
    }

    fn cpu_sample(
        &self,
        interval: Option<Duration>,
    ) -> impl Future<Output = Option<CpuSample>> + Send {
        let platform = self.platform;
        async move {
            let sys = blocking("cpu_sample", || {
                let mut sys = System::new();
                sys.refresh_cpu_all();
                sys
            })
            .await?;

            let Some(interval) = interval else {
                return Some(read_cpu(&sys, platform, false));
            };

            // Usage is a delta between two refreshes; sleep without holding a worker.
            tokio::time::sleep(interval).await;
            blocking("cpu_sample", move || {
                let mut sys = sys;
                sys.refresh_cpu_all();
                read_cpu(&sys, platform, true)
            })
            .await
        }
    }
}
