// Read-only access to the machine: environment, files, external commands, native APIs.

mod system;

pub use system::SystemHost;

use std::time::Duration;

use crate::error::ProbeError;
use crate::models::{CpuSample, MemoryUsage, NativeOs, Volume};
use crate::platform::Platform;

/// Everything collectors read goes through this trait, so a scripted host can stand in for tests.
pub trait Host: Send + Sync + 'static {
    fn platform(&self) -> Platform;

    /// Non-empty value of an environment variable.
    fn env_var(&self, key: &str) -> Option<String>;

    fn read_file(&self, path: &str) -> Result<String, ProbeError>;

    fn path_exists(&self, path: &str) -> bool;

    /// Runs a command to completion and returns its stdout. Non-zero exit and timeout are errors.
    fn run(
        &self,
        program: &str,
        args: &[&str],
    ) -> impl Future<Output = Result<String, ProbeError>> + Send;

    fn os_info(&self) -> impl Future<Output = NativeOs> + Send;

    fn memory(&self) -> impl Future<Output = Option<MemoryUsage>> + Send;

    fn volumes(&self) -> impl Future<Output = Vec<Volume>> + Send;

    /// CPU reading; with `Some(interval)` usage is measured across two samples that far apart.
    fn cpu_sample(&self, interval: Option<Duration>)
    -> impl Future<Output = Option<CpuSample>> + Send;
}
