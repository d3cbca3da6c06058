use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::collectors::CollectPlan;
use crate::platform::Platform;
use crate::policy::FastModePolicy;

pub const DEFAULT_TITLE: &str = "QUBETX DEVELOPER TOOLS";
pub const DEFAULT_SUBTITLE: &str = "TR-300 MACHINE REPORT";
pub const CONFIG_ENV: &str = "TR300_CONFIG";

/// Optional TOML file; every key has a default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub collection: CollectionSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportSettings {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_subtitle")]
    pub subtitle: String,
    #[serde(default = "default_true")]
    pub color: bool,
    #[serde(default)]
    pub ascii: bool,
    #[serde(default)]
    pub fast: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: default_subtitle(),
            color: true,
            ascii: false,
            fast: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionSettings {
    /// Upper bound for any single external command.
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,
    /// Gap between the two CPU samples used for usage.
    #[serde(default = "default_cpu_sample_ms")]
    pub cpu_sample_ms: u64,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            command_timeout_ms: default_command_timeout_ms(),
            cpu_sample_ms: default_cpu_sample_ms(),
        }
    }
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_subtitle() -> String {
    DEFAULT_SUBTITLE.to_string()
}

fn default_true() -> bool {
    true
}

fn default_command_timeout_ms() -> u64 {
    2000
}

fn default_cpu_sample_ms() -> u64 {
    200
}

impl FileConfig {
    /// Reads the file named by `TR300_CONFIG`; built-in defaults when unset.
    pub fn load() -> anyhow::Result<Self> {
        let Ok(path) = std::env::var(CONFIG_ENV) else {
            return Ok(Self::default());
        };
        let s = std::fs::read_to_string(&path).with_context(|| format!("config file {path}"))?;
        Self::load_from_str(&s).with_context(|| format!("config file {path}"))
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: FileConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.report.title.trim().is_empty(),
            "report.title must be non-empty"
        );
        anyhow::ensure!(
            !self.report.subtitle.trim().is_empty(),
            "report.subtitle must be non-empty"
        );
        anyhow::ensure!(
            (1..=60_000).contains(&self.collection.command_timeout_ms),
            "collection.command_timeout_ms must be between 1 and 60000, got {}",
            self.collection.command_timeout_ms
        );
        anyhow::ensure!(
            (1..=5_000).contains(&self.collection.cpu_sample_ms),
            "collection.cpu_sample_ms must be between 1 and 5000, got {}",
            self.collection.cpu_sample_ms
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Table,
    Ascii,
    Json,
}

/// Immutable per-run settings: file defaults with command-line overrides applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub mode: OutputMode,
    pub title: String,
    pub subtitle: String,
    pub use_color: bool,
    pub fast: bool,
    pub command_timeout: Duration,
    pub cpu_sample_interval: Duration,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::from_file(&FileConfig::default())
    }
}

impl ReportConfig {
    pub fn from_file(file: &FileConfig) -> Self {
        Self {
            mode: if file.report.ascii {
                OutputMode::Ascii
            } else {
                OutputMode::Table
            },
            title: file.report.title.clone(),
            subtitle: file.report.subtitle.clone(),
            use_color: file.report.color,
            fast: file.report.fast,
            command_timeout: Duration::from_millis(file.collection.command_timeout_ms),
            cpu_sample_interval: Duration::from_millis(file.collection.cpu_sample_ms),
        }
    }

    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    /// Blank titles keep the configured one.
    pub fn with_title(mut self, title: Option<String>) -> Self {
        if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
            self.title = title;
        }
        self
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    pub fn with_fast(mut self, fast: bool) -> Self {
        self.fast = fast;
        self
    }

    pub fn collect_plan(&self, platform: Platform) -> CollectPlan {
        CollectPlan {
            policy: FastModePolicy::new(platform, self.fast),
            cpu_sample_interval: self.cpu_sample_interval,
        }
    }
}
