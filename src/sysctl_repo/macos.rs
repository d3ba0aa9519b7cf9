// Darwin sysctl MIBs: NET_RT_IFLIST2 dump and per-index ifmibdata.

use super::{decode_ifmib_reply, finish_table_fetch};
use crate::error::{QueryKind, SystemQueryError};
use crate::iflist::layout::{IFMIBDATA_LEN, IfMibData};

// <sys/socket.h> / <net/if_mib.h> selectors (PF_ROUTE/PF_LINK are AF_ROUTE/AF_LINK)
const NET_RT_IFLIST2: libc::c_int = 6;
const NETLINK_GENERIC: libc::c_int = 0;
const IFMIB_IFDATA: libc::c_int = 2;
const IFDATA_GENERAL: libc::c_int = 1;

/// Issue one `sysctl` read. `buf = None` is a size probe.
fn sysctl_read(
    mib: &mut [libc::c_int],
    buf: Option<&mut [u8]>,
    query: QueryKind,
) -> Result<usize, SystemQueryError> {
    let (ptr, mut len) = match buf {
        Some(b) => (b.as_mut_ptr().cast::<libc::c_void>(), b.len()),
        None => (std::ptr::null_mut(), 0),
    };
    // SAFETY: `mib` is a valid array of `mib.len()` ints; `ptr` is null (size probe)
    // or points to `len` writable bytes, and the kernel writes at most `len` bytes.
    let rc = unsafe {
        libc::sysctl(
            mib.as_mut_ptr(),
            mib.len() as libc::c_uint,
            ptr,
            &mut len,
            std::ptr::null_mut(),
            0,
        )
    };
    if rc < 0 {
        return Err(SystemQueryError::last_os_error(query));
    }
    Ok(len)
}

pub(super) fn fetch_iflist2() -> Result<Vec<u8>, SystemQueryError> {
    let mut mib = [libc::CTL_NET, libc::AF_ROUTE, 0, 0, NET_RT_IFLIST2, 0];

    let required = sysctl_read(&mut mib, None, QueryKind::SizeProbe)?;
    let mut buffer = vec![0u8; required];
    // The table can change between the two calls; a grown table fails with ENOMEM,
    // a shrunk one reports fewer bytes written.
    let written = sysctl_read(&mut mib, Some(&mut buffer), QueryKind::TableFetch)?;
    tracing::trace!(required, written, "fetched NET_RT_IFLIST2");
    Ok(finish_table_fetch(buffer, written))
}

pub(super) fn fetch_ifmib_data(index: u16) -> Result<IfMibData, SystemQueryError> {
    let mut mib = [
        libc::CTL_NET,
        libc::AF_LINK,
        NETLINK_GENERIC,
        IFMIB_IFDATA,
        libc::c_int::from(index),
        IFDATA_GENERAL,
    ];

    let mut reply = [0u8; IFMIBDATA_LEN];
    let written = sysctl_read(&mut mib, Some(&mut reply), QueryKind::InterfaceData { index })?;
    decode_ifmib_reply(index, &reply, written)
}
