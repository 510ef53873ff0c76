//! SocketCAN endpoint implementation
//!
//! This module provides the `CanSocket` struct, a single-endpoint adapter
//! over a raw kernel CAN socket. Construction runs the full initialization
//! pipeline (create, resolve interface, bind, enable CAN FD reception);
//! afterwards the endpoint sends and receives classic CAN and CAN FD frames.

use std::os::raw::c_uint;
use std::os::unix::io::{AsRawFd, RawFd};
use std::time::Duration;

use log::{debug, error, trace};

use crate::constants::CANFD_MTU;
use crate::error::{CanSockError, Result};
use crate::frame::CanFrame;
use crate::transport::{CanTransport, SysTransport};

/// Lifecycle state of the endpoint
///
/// States advance monotonically during construction and are never revisited;
/// `Failed` is absorbing and short-circuits every I/O operation without
/// touching the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketState {
    /// Raw socket created, not yet attached to an interface
    Created,
    /// Interface name resolved to a kernel index
    InterfaceResolved,
    /// Socket bound to the interface
    Bound,
    /// CAN FD reception enabled; endpoint fully usable
    Ready,
    /// An initialization step failed; the endpoint is unusable
    Failed,
}

/// A raw CAN endpoint bound to one interface
///
/// Owns its socket descriptor exclusively and releases it on drop, on every
/// path including partial-initialization failure. All operations are
/// synchronous and single-threaded; callers wanting shared access must
/// synchronize externally.
///
/// # Example
///
/// ```no_run
/// use cansock::CanSocket;
/// use std::time::Duration;
///
/// fn main() -> cansock::Result<()> {
///     let mut sock = CanSocket::open("vcan0")?;
///
///     // Send a classic frame
///     let data = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0];
///     sock.send(0x123, &data)?;
///
///     // Read frames with a deadline
///     loop {
///         match sock.receive_timeout(Duration::from_millis(100)) {
///             Ok(frame) => println!("RX  {}", frame),
///             Err(cansock::CanSockError::ReadTimeout) => continue,
///             Err(e) => return Err(e),
///         }
///     }
/// }
/// ```
pub struct CanSocket<T: CanTransport = SysTransport> {
    /// OS transport performing the actual syscalls
    transport: T,
    /// Owned socket descriptor
    fd: RawFd,
    /// Lifecycle state
    state: SocketState,
    /// Interface name as given by the caller
    interface: String,
    /// Resolved kernel interface index
    ifindex: c_uint,
}

impl CanSocket<SysTransport> {
    /// Open a CAN endpoint on the named interface, e.g. `"can0"` or `"vcan0"`
    ///
    /// Runs the initialization pipeline exactly once: create the raw socket,
    /// resolve the interface, bind, enable CAN FD reception. Any step failure
    /// releases the partially acquired socket and returns the corresponding
    /// error; no retry is attempted.
    pub fn open(interface: &str) -> Result<Self> {
        Self::open_with(interface, SysTransport)
    }
}

impl<T: CanTransport> CanSocket<T> {
    /// Open a CAN endpoint using a specific transport implementation
    pub fn open_with(interface: &str, mut transport: T) -> Result<Self> {
        let fd = match transport.open_raw() {
            Ok(fd) => fd,
            Err(e) => {
                error!("socket creation failed: {}", e);
                return Err(CanSockError::SocketCreation(e));
            }
        };

        let mut sock = Self {
            transport,
            fd,
            state: SocketState::Created,
            interface: interface.to_owned(),
            ifindex: 0,
        };

        match sock.initialize() {
            Ok(()) => Ok(sock),
            Err(e) => {
                // Drop releases the partially initialized descriptor.
                sock.state = SocketState::Failed;
                Err(e)
            }
        }
    }

    fn initialize(&mut self) -> Result<()> {
        let ifindex = self.transport.resolve_interface(&self.interface);
        if ifindex == 0 {
            error!("CAN interface {} specified is not available", self.interface);
            return Err(CanSockError::InterfaceNotFound {
                name: self.interface.clone(),
            });
        }
        self.ifindex = ifindex;
        self.state = SocketState::InterfaceResolved;

        if let Err(e) = self.transport.bind_interface(self.fd, ifindex) {
            error!("binding the interface to the created socket failed: {}", e);
            return Err(CanSockError::Bind(e));
        }
        self.state = SocketState::Bound;

        // CAN FD reception is turned on unconditionally so the endpoint
        // accepts both frame shapes once ready.
        if let Err(e) = self.transport.enable_fd_frames(self.fd) {
            error!("enabling CAN FD frames failed: {}", e);
            return Err(CanSockError::EnableFd(e));
        }
        self.state = SocketState::Ready;

        debug!(
            "CAN endpoint ready on {} (ifindex {})",
            self.interface, self.ifindex
        );
        Ok(())
    }

    /// Check if the endpoint completed initialization
    pub fn is_ready(&self) -> bool {
        self.state == SocketState::Ready
    }

    /// Current lifecycle state
    pub fn state(&self) -> SocketState {
        self.state
    }

    /// Interface name this endpoint was opened on
    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Resolved kernel interface index
    pub fn ifindex(&self) -> c_uint {
        self.ifindex
    }

    /// Send a classic CAN frame
    ///
    /// Data longer than 8 bytes is clamped to 8 bytes.
    ///
    /// # Arguments
    /// * `id` - CAN identifier (with flags like CAN_EFF_FLAG if needed)
    /// * `data` - Payload bytes (1 to 8)
    ///
    /// # Returns
    /// The byte count the kernel reports as written; 16 (the classic
    /// envelope size) on success.
    pub fn send(&mut self, id: u32, data: &[u8]) -> Result<usize> {
        self.send_frame(&CanFrame::with_data(id, data))
    }

    /// Send a CAN FD frame
    ///
    /// Data longer than 64 bytes is clamped to 64 bytes.
    ///
    /// # Returns
    /// The byte count the kernel reports as written; 72 (the FD envelope
    /// size) on success.
    pub fn send_fd(&mut self, id: u32, data: &[u8]) -> Result<usize> {
        self.send_frame(&CanFrame::with_fd_data(id, data, false))
    }

    /// Send a prepared CAN frame
    ///
    /// The write is always sized to the frame shape's fixed envelope (16 or
    /// 72 bytes) regardless of the meaningful payload length; unused payload
    /// bytes go out as zeros. Frames without payload bytes are rejected
    /// before any kernel call. To move more than one frame's worth of data,
    /// a transport layer such as ISO-TP has to sit on top of this endpoint.
    pub fn send_frame(&mut self, frame: &CanFrame) -> Result<usize> {
        if self.state != SocketState::Ready {
            return Err(CanSockError::NotReady);
        }
        if frame.is_empty() {
            return Err(CanSockError::EmptyPayload);
        }

        let buf = frame.pack();
        let mtu = frame.kind().mtu();
        let written = match self.transport.write_frame(self.fd, &buf[..mtu]) {
            Ok(n) => n,
            Err(e) => {
                debug!("send failed on {}: {}", self.interface, e);
                return Err(CanSockError::Transmit(e));
            }
        };
        if written != mtu {
            return Err(CanSockError::ShortWrite {
                expected: mtu,
                actual: written,
            });
        }

        trace!("TX {} {}", self.interface, frame);
        Ok(written)
    }

    /// Receive one CAN frame, blocking indefinitely
    ///
    /// The read buffer is sized for the largest shape, so classic and FD
    /// frames are both accepted; the kernel's byte count selects the shape.
    pub fn receive(&mut self) -> Result<CanFrame> {
        if self.state != SocketState::Ready {
            return Err(CanSockError::NotReady);
        }
        self.read_one()
    }

    /// Receive one CAN frame, waiting at most `timeout`
    ///
    /// Returns [`CanSockError::ReadTimeout`] if no frame arrived before the
    /// deadline; OS failures surface as [`CanSockError::Receive`]. Like the
    /// blocking variant this path accepts both frame shapes.
    pub fn receive_timeout(&mut self, timeout: Duration) -> Result<CanFrame> {
        if self.state != SocketState::Ready {
            return Err(CanSockError::NotReady);
        }

        let readable = self
            .transport
            .wait_readable(self.fd, timeout)
            .map_err(CanSockError::Receive)?;
        if !readable {
            return Err(CanSockError::ReadTimeout);
        }
        self.read_one()
    }

    fn read_one(&mut self) -> Result<CanFrame> {
        let mut buf = [0u8; CANFD_MTU];
        let n = self
            .transport
            .read_frame(self.fd, &mut buf)
            .map_err(CanSockError::Receive)?;

        let frame = CanFrame::from_wire(&buf[..n])?;
        trace!("RX {} {}", self.interface, frame);
        Ok(frame)
    }
}

impl<T: CanTransport> AsRawFd for CanSocket<T> {
    fn as_raw_fd(&self) -> RawFd {
        self.fd
    }
}

impl<T: CanTransport> std::fmt::Display for CanSocket<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CAN endpoint {} (ifindex {}, {:?})",
            self.interface, self.ifindex, self.state
        )
    }
}

impl<T: CanTransport> std::fmt::Debug for CanSocket<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanSocket")
            .field("interface", &self.interface)
            .field("ifindex", &self.ifindex)
            .field("fd", &self.fd)
            .field("state", &self.state)
            .finish()
    }
}

impl<T: CanTransport> Drop for CanSocket<T> {
    fn drop(&mut self) {
        self.transport.close(self.fd);
    }
}
