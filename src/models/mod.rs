// Collector facts and the aggregated report snapshot

mod extras;
mod field;
mod network;
mod session;
mod snapshot;
mod storage;
mod system;

pub use extras::*;
pub use field::*;
pub use network::*;
pub use session::*;
pub use snapshot::*;
pub use storage::*;
pub use system::*;
