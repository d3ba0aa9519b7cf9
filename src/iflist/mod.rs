// NET_RT_IFLIST2 record stream: tagged, variable-length records packed back to back.
// Navigation trusts each record's declared length; interpretation trusts its tag.

pub mod layout;

use crate::error::ParseError;
use layout::{
    ExtendedInterfaceRecord, HDR_MSGLEN, HDR_TYPE, HEADER_LEN, IF_MSGHDR2_LEN,
    RTM_IFINFO, RTM_IFINFO2, RTM_NEWADDR, RTM_NEWMADDR2,
};

/// Record kind from the `ifm_type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    InterfaceInfo,
    InterfaceInfoExtended,
    NewAddress,
    NewMulticastAddress,
    Unknown(u8),
}

impl RecordKind {
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            RTM_IFINFO => RecordKind::InterfaceInfo,
            RTM_IFINFO2 => RecordKind::InterfaceInfoExtended,
            RTM_NEWADDR => RecordKind::NewAddress,
            RTM_NEWMADDR2 => RecordKind::NewMulticastAddress,
            other => RecordKind::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub length: usize,
    pub kind: RecordKind,
}

/// One record of the stream. Only `RTM_IFINFO2` is decoded; everything else is kept raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record<'a> {
    InterfaceInfoExtended(ExtendedInterfaceRecord),
    Skipped { kind: RecordKind, bytes: &'a [u8] },
}

/// Cursor over a fetched interface-list buffer.
///
/// Yields records in order. The first structural problem is yielded as an
/// error and ends the iteration.
pub struct Records<'a> {
    buf: &'a [u8],
    offset: usize,
    done: bool,
}

pub fn records(buf: &[u8]) -> Records<'_> {
    Records {
        buf,
        offset: 0,
        done: false,
    }
}

impl<'a> Records<'a> {
    /// Byte offset of the next record.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn next_record(&mut self) -> Result<Record<'a>, ParseError> {
        let offset = self.offset;
        let rest = &self.buf[offset..];
        if rest.len() < HEADER_LEN {
            return Err(ParseError::TruncatedHeader {
                offset,
                remaining: rest.len(),
            });
        }

        let header = RecordHeader {
            length: layout::read_u16(rest, HDR_MSGLEN) as usize,
            kind: RecordKind::from_tag(rest[HDR_TYPE]),
        };
        if header.length == 0 {
            return Err(ParseError::ZeroLength { offset });
        }
        if header.length > rest.len() {
            return Err(ParseError::Overrun {
                offset,
                declared: header.length,
                remaining: rest.len(),
            });
        }

        let bytes = &rest[..header.length];
        let record = match header.kind {
            RecordKind::InterfaceInfoExtended => {
                if bytes.len() < IF_MSGHDR2_LEN {
                    return Err(ParseError::ShortRecord {
                        offset,
                        declared: header.length,
                        required: IF_MSGHDR2_LEN,
                    });
                }
                Record::InterfaceInfoExtended(ExtendedInterfaceRecord::decode(bytes))
            }
            kind => Record::Skipped { kind, bytes },
        };

        self.offset += header.length;
        Ok(record)
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Result<Record<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.offset >= self.buf.len() {
            return None;
        }
        let item = self.next_record();
        if item.is_err() {
            self.done = true;
        }
        Some(item)
    }
}

impl std::iter::FusedIterator for Records<'_> {}
