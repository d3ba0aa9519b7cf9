// Kernel interface tables via sysctl(3).
// InterfaceTable is the seam the aggregator and sampler use; SysctlRepo is the OS-backed impl.

#[cfg(target_os = "macos")]
mod macos;

use crate::error::SystemQueryError;
use crate::iflist::layout::{IFMIBDATA_LEN, IfMibData};
use crate::models::InterfaceCounters;

/// Source of raw interface-list buffers and per-interface readings.
pub trait InterfaceTable: Send + Sync {
    /// Size probe then data fetch of the `NET_RT_IFLIST2` table.
    /// The returned buffer holds only the bytes the kernel actually wrote.
    fn fetch_interface_table(&self) -> Result<Vec<u8>, SystemQueryError>;

    /// `IFMIB_IFDATA` / `IFDATA_GENERAL` reading for one interface index.
    fn interface_data(&self, index: u16) -> Result<InterfaceCounters, SystemQueryError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SysctlRepo;

impl SysctlRepo {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "macos")]
impl InterfaceTable for SysctlRepo {
    fn fetch_interface_table(&self) -> Result<Vec<u8>, SystemQueryError> {
        macos::fetch_iflist2()
    }

    fn interface_data(&self, index: u16) -> Result<InterfaceCounters, SystemQueryError> {
        macos::fetch_ifmib_data(index).map(|mib| mib.data.counters())
    }
}

#[cfg(not(target_os = "macos"))]
impl InterfaceTable for SysctlRepo {
    fn fetch_interface_table(&self) -> Result<Vec<u8>, SystemQueryError> {
        Err(SystemQueryError::Unsupported)
    }

    fn interface_data(&self, _index: u16) -> Result<InterfaceCounters, SystemQueryError> {
        Err(SystemQueryError::Unsupported)
    }
}

/// Keep only the bytes the kernel wrote in the data-fetch call. The table can
/// shrink between the size query and the fetch; never expose the zeroed tail.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn finish_table_fetch(mut buffer: Vec<u8>, written: usize) -> Vec<u8> {
    let len = written.min(buffer.len());
    buffer.truncate(len);
    buffer
}

/// Validate and decode an `ifmibdata` reply of which `written` bytes are valid.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn decode_ifmib_reply(
    index: u16,
    reply: &[u8],
    written: usize,
) -> Result<IfMibData, SystemQueryError> {
    if written < IFMIBDATA_LEN || reply.len() < IFMIBDATA_LEN {
        return Err(SystemQueryError::ShortReply {
            index,
            expected: IFMIBDATA_LEN,
            actual: written.min(reply.len()),
        });
    }
    let mib = IfMibData::decode(reply);
    tracing::trace!(index, name = %mib.name, "interface data");
    Ok(mib)
}
