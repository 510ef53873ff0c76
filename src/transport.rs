//! OS transport seam for raw CAN sockets
//!
//! This module defines the `CanTransport` trait covering every kernel
//! interaction the endpoint needs, plus `SysTransport`, the libc-backed
//! implementation used in production. The trait keeps the endpoint free of
//! direct syscalls and doubles as the substitution point for tests.

use std::io;
use std::mem::size_of;
use std::os::raw::{c_int, c_short, c_uint, c_void};
use std::os::unix::io::RawFd;
use std::time::Duration;

use crate::constants::{CAN_RAW, CAN_RAW_FD_FRAMES, PF_CAN, SOL_CAN_RAW};

/// Kernel operations required by a CAN endpoint
///
/// All methods are synchronous; failures surface as `io::Error` carrying the
/// OS error code.
pub trait CanTransport {
    /// Create a raw CAN socket and return its descriptor
    fn open_raw(&mut self) -> io::Result<RawFd>;

    /// Map an interface name to its kernel index
    ///
    /// Names longer than the OS maximum are silently truncated. Returns 0 if
    /// the kernel does not recognize the name.
    fn resolve_interface(&mut self, name: &str) -> c_uint;

    /// Bind the socket to the interface with the given kernel index
    fn bind_interface(&mut self, fd: RawFd, ifindex: c_uint) -> io::Result<()>;

    /// Enable CAN FD frame reception on the bound socket
    ///
    /// Idempotent at the kernel level; repeating the request is a no-op.
    fn enable_fd_frames(&mut self, fd: RawFd) -> io::Result<()>;

    /// Write one frame envelope; returns the byte count the kernel reports
    fn write_frame(&mut self, fd: RawFd, buf: &[u8]) -> io::Result<usize>;

    /// Read one frame envelope, blocking until data or error
    fn read_frame(&mut self, fd: RawFd, buf: &mut [u8]) -> io::Result<usize>;

    /// Wait until the socket is readable or `timeout` elapses
    ///
    /// Returns `Ok(false)` on expiry with no data available.
    fn wait_readable(&mut self, fd: RawFd, timeout: Duration) -> io::Result<bool>;

    /// Release the descriptor
    fn close(&mut self, fd: RawFd);
}

/// `sockaddr_can` as handed to `bind(2)`
///
/// Field order matches the kernel struct; `repr(C)` supplies the alignment
/// padding after the family field.
#[repr(C)]
struct CanAddr {
    can_family: c_short,
    can_ifindex: c_int,
    rx_id: u32,
    tx_id: u32,
}

/// Maximum interface name length including the terminating NUL
const IFNAMSIZ: usize = libc::IFNAMSIZ;

/// Copy an interface name into a NUL-terminated kernel buffer
///
/// At most `IFNAMSIZ - 1` bytes of the name are kept; the remainder is
/// dropped silently.
fn ifname_buf(name: &str) -> [libc::c_char; IFNAMSIZ] {
    let mut buf = [0 as libc::c_char; IFNAMSIZ];
    for (dst, src) in buf[..IFNAMSIZ - 1].iter_mut().zip(name.as_bytes()) {
        *dst = *src as libc::c_char;
    }
    buf
}

/// Production transport over the Linux SocketCAN syscall surface
#[derive(Debug, Default)]
pub struct SysTransport;

impl CanTransport for SysTransport {
    fn open_raw(&mut self) -> io::Result<RawFd> {
        let fd = unsafe { libc::socket(PF_CAN, libc::SOCK_RAW, CAN_RAW) };
        if fd == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(fd)
    }

    fn resolve_interface(&mut self, name: &str) -> c_uint {
        let buf = ifname_buf(name);
        unsafe { libc::if_nametoindex(buf.as_ptr()) }
    }

    fn bind_interface(&mut self, fd: RawFd, ifindex: c_uint) -> io::Result<()> {
        let addr = CanAddr {
            can_family: crate::constants::AF_CAN as c_short,
            can_ifindex: ifindex as c_int,
            rx_id: 0,
            tx_id: 0,
        };

        let rv = unsafe {
            libc::bind(
                fd,
                &addr as *const CanAddr as *const libc::sockaddr,
                size_of::<CanAddr>() as libc::socklen_t,
            )
        };
        if rv == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn enable_fd_frames(&mut self, fd: RawFd) -> io::Result<()> {
        let enable: c_int = 1;
        let rv = unsafe {
            libc::setsockopt(
                fd,
                SOL_CAN_RAW,
                CAN_RAW_FD_FRAMES,
                &enable as *const c_int as *const c_void,
                size_of::<c_int>() as libc::socklen_t,
            )
        };
        if rv == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn write_frame(&mut self, fd: RawFd, buf: &[u8]) -> io::Result<usize> {
        let rv = unsafe { libc::write(fd, buf.as_ptr() as *const c_void, buf.len()) };
        if rv < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(rv as usize)
    }

    fn read_frame(&mut self, fd: RawFd, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let rv = unsafe { libc::read(fd, buf.as_mut_ptr() as *mut c_void, buf.len()) };
            if rv >= 0 {
                return Ok(rv as usize);
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    fn wait_readable(&mut self, fd: RawFd, timeout: Duration) -> io::Result<bool> {
        let mut pfd = libc::pollfd {
            fd,
            events: libc::POLLIN,
            revents: 0,
        };
        // poll(2) has millisecond granularity; round sub-millisecond waits up
        // so a short timeout still waits instead of returning immediately.
        let micros = timeout.as_micros();
        let timeout_ms = i32::try_from(micros.div_ceil(1000)).unwrap_or(i32::MAX);

        loop {
            let rv = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };
            if rv >= 0 {
                return Ok(rv > 0);
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    fn close(&mut self, fd: RawFd) {
        unsafe {
            libc::close(fd);
        }
    }
}
