// Darwin routing-socket structures as laid out by the kernel (native endianness).
// Offsets are fixed ABI: if_msghdr2 / if_data64 from <net/if.h>, ifmibdata from <net/if_mib.h>.

use crate::models::InterfaceCounters;

/// Record tags (`ifm_type`) seen in an `NET_RT_IFLIST2` dump.
pub const RTM_NEWADDR: u8 = 0x0c;
pub const RTM_IFINFO: u8 = 0x0e;
pub const RTM_IFINFO2: u8 = 0x12;
pub const RTM_NEWMADDR2: u8 = 0x13;

/// `ifm_msglen` + `ifm_version` + `ifm_type`.
pub const HEADER_LEN: usize = 4;
pub const IF_MSGHDR2_LEN: usize = 160;
pub const IF_DATA64_LEN: usize = 128;
pub const IFMIBDATA_LEN: usize = 180;

// Common header
pub const HDR_MSGLEN: usize = 0;
pub const HDR_VERSION: usize = 2;
pub const HDR_TYPE: usize = 3;

// if_msghdr2
pub const IFM_FLAGS: usize = 8;
pub const IFM_INDEX: usize = 12;
pub const IFM_DATA: usize = 32;

// if_data64
pub const IFI_MTU: usize = 8;
pub const IFI_IPACKETS: usize = 24;
pub const IFI_IERRORS: usize = 32;
pub const IFI_OPACKETS: usize = 40;
pub const IFI_OERRORS: usize = 48;
pub const IFI_IBYTES: usize = 64;
pub const IFI_OBYTES: usize = 72;
pub const IFI_IQDROPS: usize = 96;

// ifmibdata
pub const IFMD_NAME: usize = 0;
pub const IFNAMSIZ: usize = 16;
pub const IFMD_DATA: usize = 52;

pub const IFF_UP: i32 = 0x1;
pub const IFF_LOOPBACK: i32 = 0x8;

pub(crate) fn read_u16(b: &[u8], at: usize) -> u16 {
    u16::from_ne_bytes([b[at], b[at + 1]])
}

fn read_u32(b: &[u8], at: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&b[at..at + 4]);
    u32::from_ne_bytes(raw)
}

fn read_i32(b: &[u8], at: usize) -> i32 {
    read_u32(b, at) as i32
}

fn read_u64(b: &[u8], at: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&b[at..at + 8]);
    u64::from_ne_bytes(raw)
}

/// `ifm_flags` bitset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterfaceFlags(pub i32);

impl InterfaceFlags {
    pub fn is_up(self) -> bool {
        self.0 & IFF_UP != 0
    }

    pub fn is_loopback(self) -> bool {
        self.0 & IFF_LOOPBACK != 0
    }
}

/// `struct if_data64`: the 64-bit counter block shared by both counter sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IfData64 {
    pub mtu: u32,
    pub ipackets: u64,
    pub ierrors: u64,
    pub opackets: u64,
    pub oerrors: u64,
    pub ibytes: u64,
    pub obytes: u64,
    pub iqdrops: u64,
}

impl IfData64 {
    /// Decode from the first `IF_DATA64_LEN` bytes of `b`. Caller checks the length.
    pub fn decode(b: &[u8]) -> Self {
        debug_assert!(b.len() >= IF_DATA64_LEN);
        Self {
            mtu: read_u32(b, IFI_MTU),
            ipackets: read_u64(b, IFI_IPACKETS),
            ierrors: read_u64(b, IFI_IERRORS),
            opackets: read_u64(b, IFI_OPACKETS),
            oerrors: read_u64(b, IFI_OERRORS),
            ibytes: read_u64(b, IFI_IBYTES),
            obytes: read_u64(b, IFI_OBYTES),
            iqdrops: read_u64(b, IFI_IQDROPS),
        }
    }

    pub fn counters(&self) -> InterfaceCounters {
        InterfaceCounters {
            input_bytes: self.ibytes,
            output_bytes: self.obytes,
            input_packets: self.ipackets,
            output_packets: self.opackets,
        }
    }
}

/// `struct if_msghdr2` body (`RTM_IFINFO2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtendedInterfaceRecord {
    pub index: u16,
    pub flags: InterfaceFlags,
    /// Embedded counters; ibytes/obytes truncate at 4 GiB on some macOS releases.
    pub data: IfData64,
}

impl ExtendedInterfaceRecord {
    /// Decode from a record slice of at least `IF_MSGHDR2_LEN` bytes. Caller checks the length.
    pub fn decode(b: &[u8]) -> Self {
        debug_assert!(b.len() >= IF_MSGHDR2_LEN);
        Self {
            index: read_u16(b, IFM_INDEX),
            flags: InterfaceFlags(read_i32(b, IFM_FLAGS)),
            data: IfData64::decode(&b[IFM_DATA..]),
        }
    }
}

/// `struct ifmibdata` as returned for `IFMIB_IFDATA` / `IFDATA_GENERAL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfMibData {
    pub name: String,
    pub data: IfData64,
}

impl IfMibData {
    /// Decode from a reply of at least `IFMIBDATA_LEN` bytes. Caller checks the length.
    pub fn decode(b: &[u8]) -> Self {
        debug_assert!(b.len() >= IFMIBDATA_LEN);
        let raw_name = &b[IFMD_NAME..IFMD_NAME + IFNAMSIZ];
        let end = raw_name.iter().position(|&c| c == 0).unwrap_or(IFNAMSIZ);
        Self {
            name: String::from_utf8_lossy(&raw_name[..end]).into_owned(),
            data: IfData64::decode(&b[IFMD_DATA..]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put_u64(b: &mut [u8], at: usize, v: u64) {
        b[at..at + 8].copy_from_slice(&v.to_ne_bytes());
    }

    #[test]
    fn extended_record_reads_counters_at_fixed_offsets() {
        let mut rec = vec![0u8; IF_MSGHDR2_LEN];
        rec[HDR_MSGLEN..HDR_MSGLEN + 2].copy_from_slice(&(IF_MSGHDR2_LEN as u16).to_ne_bytes());
        rec[HDR_TYPE] = RTM_IFINFO2;
        rec[IFM_FLAGS..IFM_FLAGS + 4].copy_from_slice(&(IFF_UP | IFF_LOOPBACK).to_ne_bytes());
        rec[IFM_INDEX..IFM_INDEX + 2].copy_from_slice(&7u16.to_ne_bytes());
        put_u64(&mut rec, IFM_DATA + IFI_IBYTES, 5_000_000_000);
        put_u64(&mut rec, IFM_DATA + IFI_OBYTES, 42);
        put_u64(&mut rec, IFM_DATA + IFI_IPACKETS, 3);
        put_u64(&mut rec, IFM_DATA + IFI_OPACKETS, 4);
        put_u64(&mut rec, IFM_DATA + IFI_IERRORS, 5);
        put_u64(&mut rec, IFM_DATA + IFI_IQDROPS, 6);
        rec[IFM_DATA + IFI_MTU..IFM_DATA + IFI_MTU + 4].copy_from_slice(&1500u32.to_ne_bytes());

        let decoded = ExtendedInterfaceRecord::decode(&rec);
        assert_eq!(decoded.index, 7);
        assert!(decoded.flags.is_loopback());
        assert!(decoded.flags.is_up());
        assert_eq!(decoded.data.ierrors, 5);
        assert_eq!(decoded.data.iqdrops, 6);
        assert_eq!(decoded.data.mtu, 1500);
        assert_eq!(
            decoded.data.counters(),
            InterfaceCounters {
                input_bytes: 5_000_000_000,
                output_bytes: 42,
                input_packets: 3,
                output_packets: 4,
            }
        );
    }

    #[test]
    fn ifmibdata_name_stops_at_nul() {
        let mut reply = vec![0u8; IFMIBDATA_LEN];
        reply[..3].copy_from_slice(b"en0");
        put_u64(&mut reply, IFMD_DATA + IFI_OBYTES, 9);
        let decoded = IfMibData::decode(&reply);
        assert_eq!(decoded.name, "en0");
        assert_eq!(decoded.data.obytes, 9);
    }

    #[test]
    fn data_block_fits_inside_both_containers() {
        assert_eq!(IFM_DATA + IF_DATA64_LEN, IF_MSGHDR2_LEN);
        assert_eq!(IFMD_DATA + IF_DATA64_LEN, IFMIBDATA_LEN);
    }
}
