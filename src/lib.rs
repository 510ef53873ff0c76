//! Raw SocketCAN endpoint for Rust
//!
//! This crate provides a single-endpoint adapter over Linux raw CAN sockets
//! for sending and receiving classic CAN frames (up to 8 data bytes) and
//! CAN FD frames (up to 64 data bytes).
//!
//! # Features
//!
//! - One-shot initialization pipeline: create, resolve interface, bind,
//!   enable CAN FD reception
//! - Classic CAN and CAN FD on the same socket
//! - Blocking and time-bounded receive with a distinguished timeout outcome
//! - Typed errors carrying the OS error code
//! - Transport trait seam for substituting the kernel in tests
//!
//! # Example
//!
//! ```no_run
//! use cansock::{CanSocket, CanSockError};
//! use std::time::Duration;
//!
//! fn main() -> cansock::Result<()> {
//!     let mut sock = CanSocket::open("vcan0")?;
//!
//!     // Send a classic frame (returns the 16-byte envelope size)
//!     let data = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0];
//!     let written = sock.send(0x123, &data)?;
//!     assert_eq!(written, 16);
//!
//!     // Read frames with a deadline
//!     loop {
//!         match sock.receive_timeout(Duration::from_millis(100)) {
//!             Ok(frame) => println!("RX  {}", frame),
//!             Err(CanSockError::ReadTimeout) => continue,
//!             Err(e) => return Err(e),
//!         }
//!     }
//! }
//! ```
//!
//! A transport layer such as ISO-TP is needed to move payloads larger than
//! one frame; this crate stops at the frame boundary.

pub mod constants;
pub mod error;
pub mod frame;
pub mod socket;
pub mod transport;

// Re-export main types at crate root
pub use constants::{
    // CAN ID flags
    CAN_EFF_FLAG,
    // CAN ID masks
    CAN_EFF_MASK,
    CAN_ERR_FLAG,
    CAN_ERR_MASK,
    CAN_RTR_FLAG,
    CAN_SFF_MASK,
    // Payload capacities
    CANFD_MAX_DLEN,
    CAN_MAX_DLEN,
    // Envelope sizes
    CANFD_MTU,
    CAN_MTU,
};

pub use error::{CanSockError, Result};
pub use frame::{CanFrame, FrameKind};
pub use socket::{CanSocket, SocketState};
pub use transport::{CanTransport, SysTransport};
