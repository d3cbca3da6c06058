// OS identity, CPU and memory facts as reported by collectors

use super::Field;

/// Identity captured through the native platform API in one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NativeOs {
    pub name: Option<String>,
    pub version: Option<String>,
    pub kernel: Option<String>,
    pub architecture: Option<String>,
    pub hostname: Option<String>,
    pub uptime_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OsFacts {
    pub name: Option<Field<String>>,
    pub version: Option<Field<String>>,
    pub kernel: Option<Field<String>>,
    pub architecture: Option<Field<String>>,
    pub hostname: Option<Field<String>>,
    pub uptime_seconds: Option<Field<u64>>,
}

/// Raw 1/5/15 minute load, or the same triple expressed as percent of capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

impl LoadAverage {
    pub fn flat(value: f64) -> Self {
        Self {
            one: value,
            five: value,
            fifteen: value,
        }
    }

    /// Load relative to `cores` as a percentage capped at 100.
    pub fn as_percent_of(&self, cores: usize) -> Self {
        let cores = cores.max(1) as f64;
        let pct = |load: f64| (load / cores * 100.0).clamp(0.0, 100.0);
        Self {
            one: pct(self.one),
            five: pct(self.five),
            fifteen: pct(self.fifteen),
        }
    }
}

/// One CPU reading. Usage fields are only set when a second sample was taken.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuSample {
    pub brand: Option<String>,
    pub logical_cores: usize,
    pub physical_cores: Option<usize>,
    pub frequency_mhz: Option<u64>,
    pub usage_percent: Option<f64>,
    pub per_core_percent: Vec<f64>,
    pub load_average: Option<LoadAverage>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuFacts {
    pub processor: Option<Field<String>>,
    pub logical_cores: Option<Field<usize>>,
    pub physical_cores: Option<Field<usize>>,
    pub sockets: Option<Field<usize>>,
    pub frequency_mhz: Option<Field<u64>>,
    pub usage_percent: Option<Field<f64>>,
    pub per_core_percent: Option<Field<Vec<f64>>>,
    /// Already relative to logical core count.
    pub load_percent: Option<Field<LoadAverage>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MemoryUsage {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
    pub swap_total_bytes: u64,
    pub swap_used_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryFacts {
    pub usage: Option<Field<MemoryUsage>>,
}
