// Interface traffic models: one interface's reading and the all-interface total

use serde::{Deserialize, Serialize};

/// Byte/packet quadruple read for a single interface, from either counter source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceCounters {
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub input_packets: u64,
    pub output_packets: u64,
}

/// Totals summed across every interface at one sampling instant.
/// A fresh value is produced per sample; equality is structural.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMetrics {
    pub total_input_bytes: u64,
    pub total_output_bytes: u64,
    pub total_input_packets: u64,
    pub total_output_packets: u64,
}

impl NetworkMetrics {
    /// Fold one interface reading into the totals. Sums wrap at u64; a wrap
    /// shows up as `current < previous` at the delta stage.
    pub fn accumulate(self, counters: &InterfaceCounters) -> Self {
        Self {
            total_input_bytes: self.total_input_bytes.wrapping_add(counters.input_bytes),
            total_output_bytes: self.total_output_bytes.wrapping_add(counters.output_bytes),
            total_input_packets: self.total_input_packets.wrapping_add(counters.input_packets),
            total_output_packets: self
                .total_output_packets
                .wrapping_add(counters.output_packets),
        }
    }
}

impl From<InterfaceCounters> for NetworkMetrics {
    fn from(c: InterfaceCounters) -> Self {
        NetworkMetrics::default().accumulate(&c)
    }
}
