// Per-interval deltas between two consecutive NetworkMetrics snapshots.
// Wraps are observed and reported, never compensated.

use serde::Serialize;

use super::NetworkMetrics;

/// Change of one cumulative counter across an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum CounterDelta {
    /// `current >= previous`; the plain difference.
    Advanced { delta: u64 },
    /// `current < previous`: the kernel counter was truncated or wrapped.
    Wrapped { before: u64, after: u64, difference: u64 },
}

impl CounterDelta {
    pub fn between(previous: u64, current: u64) -> Self {
        match current.checked_sub(previous) {
            Some(delta) => CounterDelta::Advanced { delta },
            None => CounterDelta::Wrapped {
                before: previous,
                after: current,
                difference: previous - current,
            },
        }
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, CounterDelta::Wrapped { .. })
    }

    /// The delta when the counter advanced; `None` on a wrap.
    pub fn advanced(&self) -> Option<u64> {
        match self {
            CounterDelta::Advanced { delta } => Some(*delta),
            CounterDelta::Wrapped { .. } => None,
        }
    }
}

/// One reporting interval: current totals plus a delta per counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalReport {
    pub current: NetworkMetrics,
    pub input_bytes: CounterDelta,
    pub output_bytes: CounterDelta,
    pub input_packets: CounterDelta,
    pub output_packets: CounterDelta,
}

impl IntervalReport {
    pub fn between(previous: &NetworkMetrics, current: &NetworkMetrics) -> Self {
        Self {
            current: *current,
            input_bytes: CounterDelta::between(
                previous.total_input_bytes,
                current.total_input_bytes,
            ),
            output_bytes: CounterDelta::between(
                previous.total_output_bytes,
                current.total_output_bytes,
            ),
            input_packets: CounterDelta::between(
                previous.total_input_packets,
                current.total_input_packets,
            ),
            output_packets: CounterDelta::between(
                previous.total_output_packets,
                current.total_output_packets,
            ),
        }
    }

    /// Input byte counter went backwards.
    pub fn input_overflow(&self) -> bool {
        self.input_bytes.is_wrapped()
    }

    /// Output byte counter went backwards.
    pub fn output_overflow(&self) -> bool {
        self.output_bytes.is_wrapped()
    }

    pub fn has_overflow(&self) -> bool {
        self.input_bytes.is_wrapped()
            || self.output_bytes.is_wrapped()
            || self.input_packets.is_wrapped()
            || self.output_packets.is_wrapped()
    }
}
