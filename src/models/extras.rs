// Platform-specific extras: GPUs, virtualization, power, edition, desktop

use super::{Field, Outcome};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlatformExtras {
    pub gpus: Option<Field<Vec<String>>>,
    /// Kept as an outcome: the "Bare Metal" label depends on whether the chain ran.
    pub virtualization: Outcome<String>,
    pub battery: Option<Field<String>>,
    pub edition: Option<Field<String>>,
    pub boot_mode: Option<Field<String>>,
    pub desktop_environment: Option<Field<String>>,
    pub display_server: Option<Field<String>>,
}
