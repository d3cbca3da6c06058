// Collectors: one per information domain, each owning the provider chains for its facts.

pub mod cpu;
pub mod disk;
pub mod extras;
pub mod memory;
pub mod network;
pub mod os;
pub mod session;

use std::time::Duration;

use crate::host::Host;
use crate::models::{
    CpuFacts, DiskFacts, MemoryFacts, NetworkFacts, OsFacts, PlatformExtras, SessionFacts,
};
use crate::policy::FastModePolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Os,
    Cpu,
    Memory,
    Disk,
    Network,
    Session,
    Extras,
}

impl Domain {
    pub const ALL: [Domain; 7] = [
        Domain::Os,
        Domain::Cpu,
        Domain::Memory,
        Domain::Disk,
        Domain::Network,
        Domain::Session,
        Domain::Extras,
    ];
}

/// Partial result of one collector. Collectors never fail; missing facts are `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectorOutput {
    Os(OsFacts),
    Cpu(CpuFacts),
    Memory(MemoryFacts),
    Disk(DiskFacts),
    Network(NetworkFacts),
    Session(SessionFacts),
    Extras(PlatformExtras),
}

impl CollectorOutput {
    pub fn domain(&self) -> Domain {
        match self {
            CollectorOutput::Os(_) => Domain::Os,
            CollectorOutput::Cpu(_) => Domain::Cpu,
            CollectorOutput::Memory(_) => Domain::Memory,
            CollectorOutput::Disk(_) => Domain::Disk,
            CollectorOutput::Network(_) => Domain::Network,
            CollectorOutput::Session(_) => Domain::Session,
            CollectorOutput::Extras(_) => Domain::Extras,
        }
    }
}

/// Per-run collection settings shared by every collector task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectPlan {
    pub policy: FastModePolicy,
    pub cpu_sample_interval: Duration,
}

pub async fn collect<H: Host>(domain: Domain, host: &H, plan: &CollectPlan) -> CollectorOutput {
    let policy = &plan.policy;
    match domain {
        Domain::Os => CollectorOutput::Os(os::collect(host, policy).await),
        Domain::Cpu => {
            CollectorOutput::Cpu(cpu::collect(host, policy, plan.cpu_sample_interval).await)
        }
        Domain::Memory => CollectorOutput::Memory(memory::collect(host, policy).await),
        Domain::Disk => CollectorOutput::Disk(disk::collect(host, policy).await),
        Domain::Network => CollectorOutput::Network(network::collect(host, policy).await),
        Domain::Session => CollectorOutput::Session(session::collect(host, policy).await),
        Domain::Extras => CollectorOutput::Extras(extras::collect(host, policy).await),
    }
}
