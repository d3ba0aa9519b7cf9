// Shared test helpers: synthetic NET_RT_IFLIST2 buffers and a mock interface table

#![allow(dead_code)]

use ifstat_probe::error::{QueryKind, SystemQueryError};
use ifstat_probe::iflist::layout::*;
use ifstat_probe::models::InterfaceCounters;
use ifstat_probe::sysctl_repo::InterfaceTable;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::oneshot;

pub fn counters(ibytes: u64, obytes: u64, ipackets: u64, opackets: u64) -> InterfaceCounters {
    InterfaceCounters {
        input_bytes: ibytes,
        output_bytes: obytes,
        input_packets: ipackets,
        output_packets: opackets,
    }
}

fn put_u64(b: &mut [u8], at: usize, v: u64) {
    b[at..at + 8].copy_from_slice(&v.to_ne_bytes());
}

/// Builds a record stream the way the kernel packs it: records back to back.
#[derive(Default)]
pub struct BufferBuilder {
    buf: Vec<u8>,
}

impl BufferBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `RTM_IFINFO2` record with the given index, flags and embedded counters.
    pub fn extended(mut self, index: u16, flags: i32, c: InterfaceCounters) -> Self {
        let mut rec = vec![0u8; IF_MSGHDR2_LEN];
        rec[HDR_MSGLEN..HDR_MSGLEN + 2].copy_from_slice(&(IF_MSGHDR2_LEN as u16).to_ne_bytes());
        rec[HDR_VERSION] = 5;
        rec[HDR_TYPE] = RTM_IFINFO2;
        rec[IFM_FLAGS..IFM_FLAGS + 4].copy_from_slice(&flags.to_ne_bytes());
        rec[IFM_INDEX..IFM_INDEX + 2].copy_from_slice(&index.to_ne_bytes());
        put_u64(&mut rec, IFM_DATA + IFI_IBYTES, c.input_bytes);
        put_u64(&mut rec, IFM_DATA + IFI_OBYTES, c.output_bytes);
        put_u64(&mut rec, IFM_DATA + IFI_IPACKETS, c.input_packets);
        put_u64(&mut rec, IFM_DATA + IFI_OPACKETS, c.output_packets);
        self.buf.extend_from_slice(&rec);
        self
    }

    /// Any other record: `len` bytes with the given tag, body filled with 0xAB.
    pub fn other(mut self, tag: u8, len: u16) -> Self {
        let mut rec = vec![0xABu8; len as usize];
        rec[HDR_MSGLEN..HDR_MSGLEN + 2].copy_from_slice(&len.to_ne_bytes());
        rec[HDR_VERSION] = 5;
        rec[HDR_TYPE] = tag;
        self.buf.extend_from_slice(&rec);
        self
    }

    /// Header claiming `declared` bytes inside an `actual`-byte record (rest zeroed).
    pub fn raw_header(mut self, tag: u8, declared: u16, actual: usize) -> Self {
        let mut rec = vec![0u8; actual.max(HEADER_LEN)];
        rec[HDR_MSGLEN..HDR_MSGLEN + 2].copy_from_slice(&declared.to_ne_bytes());
        rec[HDR_TYPE] = tag;
        self.buf.extend_from_slice(&rec);
        self
    }

    pub fn bytes(mut self, extra: &[u8]) -> Self {
        self.buf.extend_from_slice(extra);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

/// In-memory InterfaceTable: scripted table buffers and per-index readings.
pub struct MockTable {
    tables: Mutex<Vec<Result<Vec<u8>, i32>>>,
    readings: HashMap<u16, InterfaceCounters>,
    shutdown_on: Mutex<Option<(usize, oneshot::Sender<()>)>>,
    pub fetches: AtomicUsize,
    pub queries: AtomicUsize,
}

impl MockTable {
    /// Always returns `table`.
    pub fn new(table: Vec<u8>) -> Self {
        Self::scripted(vec![Ok(table)])
    }

    /// Returns each entry in turn (`Err(errno)` fails the fetch); the last entry repeats.
    pub fn scripted(tables: Vec<Result<Vec<u8>, i32>>) -> Self {
        Self {
            tables: Mutex::new(tables),
            readings: HashMap::new(),
            shutdown_on: Mutex::new(None),
            fetches: AtomicUsize::new(0),
            queries: AtomicUsize::new(0),
        }
    }

    pub fn with_reading(mut self, index: u16, c: InterfaceCounters) -> Self {
        self.readings.insert(index, c);
        self
    }

    /// Fire `tx` during the `n`th table fetch. The sample that fetch belongs to
    /// still completes, so a run loop reports it before it sees the shutdown.
    pub fn shutdown_after(self, n: usize, tx: oneshot::Sender<()>) -> Self {
        *self.shutdown_on.lock().unwrap() = Some((n, tx));
        self
    }
}

impl InterfaceTable for MockTable {
    fn fetch_interface_table(&self) -> Result<Vec<u8>, SystemQueryError> {
        let fetched = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut hook = self.shutdown_on.lock().unwrap();
            if hook.as_ref().is_some_and(|(n, _)| *n == fetched) {
                if let Some((_, tx)) = hook.take() {
                    let _ = tx.send(());
                }
            }
        }
        let mut tables = self.tables.lock().unwrap();
        let next = if tables.len() > 1 {
            tables.remove(0)
        } else {
            tables[0].clone()
        };
        next.map_err(|errno| SystemQueryError::Os {
            query: QueryKind::TableFetch,
            source: std::io::Error::from_raw_os_error(errno),
        })
    }

    fn interface_data(&self, index: u16) -> Result<InterfaceCounters, SystemQueryError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.readings
            .get(&index)
            .copied()
            .ok_or_else(|| SystemQueryError::Os {
                query: QueryKind::InterfaceData { index },
                source: std::io::Error::from_raw_os_error(libc::ENOENT),
            })
    }
}
