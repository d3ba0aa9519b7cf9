//! Error types for the probe.
//!
//! OS query failures and structural buffer problems are kept apart so the
//! driver can tell "the kernel said no" from "the bytes made no sense".

use std::fmt;
use thiserror::Error;

/// Result type alias for sampling operations.
pub type Result<T> = std::result::Result<T, ProbeError>;

/// Which sysctl call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// First call of the two-call pattern: ask for the interface-list size.
    SizeProbe,
    /// Second call: copy the interface list into the allocated buffer.
    TableFetch,
    /// Per-interface `IFDATA_GENERAL` reading.
    InterfaceData { index: u16 },
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKind::SizeProbe => write!(f, "interface list size probe"),
            QueryKind::TableFetch => write!(f, "interface list fetch"),
            QueryKind::InterfaceData { index } => write!(f, "interface data for index {index}"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SystemQueryError {
    #[error("sysctl {query} failed: {source}")]
    Os {
        query: QueryKind,
        #[source]
        source: std::io::Error,
    },

    #[error("sysctl interface data for index {index} returned {actual} bytes, expected {expected}")]
    ShortReply {
        index: u16,
        expected: usize,
        actual: usize,
    },

    #[error("kernel interface tables are not available on this platform")]
    Unsupported,
}

impl SystemQueryError {
    /// Capture `errno` right after a failed sysctl call.
    pub fn last_os_error(query: QueryKind) -> Self {
        SystemQueryError::Os {
            query,
            source: std::io::Error::last_os_error(),
        }
    }
}

/// The interface-list buffer does not partition into well-formed records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("record at offset {offset} declares zero length")]
    ZeroLength { offset: usize },

    #[error("record header at offset {offset} truncated: {remaining} bytes left")]
    TruncatedHeader { offset: usize, remaining: usize },

    #[error("record at offset {offset} declares {declared} bytes but only {remaining} remain")]
    Overrun {
        offset: usize,
        declared: usize,
        remaining: usize,
    },

    #[error("extended interface record at offset {offset} declares {declared} bytes, needs {required}")]
    ShortRecord {
        offset: usize,
        declared: usize,
        required: usize,
    },
}

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error(transparent)]
    Query(#[from] SystemQueryError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
