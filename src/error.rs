//! Error types for the SocketCAN endpoint
//!
//! This module defines the error types used throughout the library for
//! handling socket initialization, transmit and receive failures.

use std::io;

use thiserror::Error;

/// Result type alias for SocketCAN operations
pub type Result<T> = std::result::Result<T, CanSockError>;

/// Error types for SocketCAN endpoint operations
#[derive(Error, Debug)]
pub enum CanSockError {
    /// Creating the raw CAN socket failed
    #[error("socket creation failed: {0}")]
    SocketCreation(io::Error),

    /// The named CAN interface is not known to the kernel
    #[error("CAN interface {name:?} is not available")]
    InterfaceNotFound { name: String },

    /// Binding the socket to the interface failed
    #[error("binding the interface to the created socket failed: {0}")]
    Bind(io::Error),

    /// Enabling CAN FD frame reception failed
    #[error("enabling CAN FD frames failed: {0}")]
    EnableFd(io::Error),

    /// The endpoint is not in the ready state
    #[error("endpoint is not ready")]
    NotReady,

    /// A send was requested with an empty payload
    #[error("refusing to send an empty payload")]
    EmptyPayload,

    /// The kernel write failed
    #[error("transmit failed: {0}")]
    Transmit(io::Error),

    /// The kernel wrote fewer bytes than one full frame envelope
    #[error("short write: expected {expected} bytes, wrote {actual}")]
    ShortWrite { expected: usize, actual: usize },

    /// Timeout during a time-bounded receive
    #[error("read timeout")]
    ReadTimeout,

    /// The kernel read failed
    #[error("receive failed: {0}")]
    Receive(io::Error),

    /// The kernel returned a byte count matching neither frame envelope
    #[error("invalid frame size: {size} bytes")]
    InvalidFrameSize { size: usize },
}

impl CanSockError {
    /// Check if this error is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, CanSockError::ReadTimeout)
    }

    /// Check if this error originated in the OS socket layer
    pub fn is_os_error(&self) -> bool {
        matches!(
            self,
            CanSockError::SocketCreation(_)
                | CanSockError::Bind(_)
                | CanSockError::EnableFd(_)
                | CanSockError::Transmit(_)
                | CanSockError::Receive(_)
        )
    }

    /// Raw OS error code (errno) carried by this error, if any
    pub fn os_error(&self) -> Option<i32> {
        match self {
            CanSockError::SocketCreation(e)
            | CanSockError::Bind(e)
            | CanSockError::EnableFd(e)
            | CanSockError::Transmit(e)
            | CanSockError::Receive(e) => e.raw_os_error(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_classification() {
        assert!(CanSockError::ReadTimeout.is_timeout());
        assert!(!CanSockError::EmptyPayload.is_timeout());
        assert!(!CanSockError::NotReady.is_timeout());
    }

    #[test]
    fn test_os_error_code_passthrough() {
        let err = CanSockError::Transmit(io::Error::from_raw_os_error(libc::ENOBUFS));
        assert!(err.is_os_error());
        assert_eq!(err.os_error(), Some(libc::ENOBUFS));
    }

    #[test]
    fn test_no_os_error_for_argument_errors() {
        assert_eq!(CanSockError::EmptyPayload.os_error(), None);
        assert!(!CanSockError::ReadTimeout.is_os_error());
    }
}
