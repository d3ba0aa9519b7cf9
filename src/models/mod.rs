// Domain models

mod interval;
mod network;

pub use interval::{CounterDelta, IntervalReport};
pub use network::{InterfaceCounters, NetworkMetrics};
