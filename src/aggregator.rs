// Fold an interface-list buffer into one NetworkMetrics total.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::iflist::{self, Record};
use crate::models::NetworkMetrics;
use crate::sysctl_repo::InterfaceTable;

/// Where per-interface counters come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterSource {
    /// Counters embedded in each `RTM_IFINFO2` record. One sysctl per sample;
    /// byte counters truncate at 4 GiB on some macOS releases.
    Embedded,
    /// A separate `IFDATA_GENERAL` query per interface index. One extra sysctl
    /// per interface; not affected by the truncation.
    #[default]
    PerInterface,
}

impl CounterSource {
    pub fn uses_supplementary_query(self) -> bool {
        matches!(self, CounterSource::PerInterface)
    }
}

/// Walk `buffer` and sum the counters of every extended interface record.
///
/// Any malformed record or failed per-interface query aborts the whole
/// aggregation; no partial totals are returned.
#[instrument(skip_all, fields(buffer_len = buffer.len(), source = ?source))]
pub fn aggregate<T>(buffer: &[u8], source: CounterSource, table: &T) -> Result<NetworkMetrics>
where
    T: InterfaceTable + ?Sized,
{
    let mut totals = NetworkMetrics::default();
    let mut seen = 0usize;
    let mut decoded = 0usize;

    for record in iflist::records(buffer) {
        seen += 1;
        let info = match record? {
            Record::InterfaceInfoExtended(info) => info,
            Record::Skipped { .. } => continue,
        };
        decoded += 1;

        let counters = match source {
            CounterSource::Embedded => info.data.counters(),
            CounterSource::PerInterface => table.interface_data(info.index)?,
        };
        tracing::trace!(
            index = info.index,
            up = info.flags.is_up(),
            loopback = info.flags.is_loopback(),
            mtu = info.data.mtu,
            input_errors = info.data.ierrors,
            output_errors = info.data.oerrors,
            input_drops = info.data.iqdrops,
            input_bytes = counters.input_bytes,
            output_bytes = counters.output_bytes,
            input_packets = counters.input_packets,
            output_packets = counters.output_packets,
            "interface counters"
        );
        totals = totals.accumulate(&counters);
    }

    tracing::debug!(records = seen, interfaces = decoded, ?totals, "aggregated");
    Ok(totals)
}
