//! CAN frame implementation
//!
//! This module provides the `CanFrame` struct for representing frames in the
//! kernel's SocketCAN wire layout, including support for both classic CAN
//! (up to 8 data bytes) and CAN FD (up to 64 data bytes).

use crate::constants::{
    CANFD_BRS, CANFD_MAX_DLEN, CANFD_MTU, CAN_EFF_FLAG, CAN_EFF_MASK, CAN_ERR_FLAG, CAN_MAX_DLEN,
    CAN_MTU, CAN_RTR_FLAG, FRAME_DATA_OFFSET, FRAME_FLAGS_OFFSET, FRAME_ID_OFFSET,
    FRAME_LEN_OFFSET,
};
use crate::error::{CanSockError, Result};

/// Shape of a CAN frame on the wire
///
/// The kind fixes both the payload capacity and the envelope size that is
/// transferred through the socket, independent of how many payload bytes are
/// meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Classic CAN frame (up to 8 data bytes, 16-byte envelope)
    Classic,
    /// CAN FD frame (up to 64 data bytes, 72-byte envelope)
    Fd,
}

impl FrameKind {
    /// Maximum number of payload bytes for this frame shape
    pub fn capacity(self) -> usize {
        match self {
            FrameKind::Classic => CAN_MAX_DLEN,
            FrameKind::Fd => CANFD_MAX_DLEN,
        }
    }

    /// Fixed number of bytes transferred through the socket per frame
    pub fn mtu(self) -> usize {
        match self {
            FrameKind::Classic => CAN_MTU,
            FrameKind::Fd => CANFD_MTU,
        }
    }
}

/// A single CAN frame
///
/// Holds the identifier (with flag bits passed through verbatim), the
/// meaningful payload length and a payload buffer sized for the largest
/// shape. Bytes beyond the meaningful length are always zero, so a packed
/// frame never carries stale data onto the bus.
#[derive(Clone)]
pub struct CanFrame {
    /// CAN identifier (with flags like CAN_EFF_FLAG if needed)
    id: u32,
    /// Number of meaningful payload bytes
    len: u8,
    /// FD flags (BRS, ESI); zero for classic frames
    flags: u8,
    /// Frame data (up to 64 bytes for CAN FD)
    data: [u8; CANFD_MAX_DLEN],
    /// Wire shape of this frame
    kind: FrameKind,
}

impl CanFrame {
    /// Create a classic CAN frame with the specified ID and data
    ///
    /// Data longer than 8 bytes is clamped to 8 bytes.
    ///
    /// # Arguments
    /// * `id` - CAN identifier (with flags like CAN_EFF_FLAG if needed)
    /// * `data` - Frame data (up to 8 bytes)
    pub fn with_data(id: u32, data: &[u8]) -> Self {
        Self::build(id, data, 0, FrameKind::Classic)
    }

    /// Create a CAN FD frame with the specified ID and data
    ///
    /// Data longer than 64 bytes is clamped to 64 bytes.
    ///
    /// # Arguments
    /// * `id` - CAN identifier (with flags like CAN_EFF_FLAG if needed)
    /// * `data` - Frame data (up to 64 bytes)
    /// * `brs` - Enable bit rate switch (transmit data at the higher rate)
    pub fn with_fd_data(id: u32, data: &[u8], brs: bool) -> Self {
        let flags = if brs { CANFD_BRS } else { 0 };
        Self::build(id, data, flags, FrameKind::Fd)
    }

    fn build(id: u32, data: &[u8], flags: u8, kind: FrameKind) -> Self {
        let len = data.len().min(kind.capacity());
        let mut buf = [0u8; CANFD_MAX_DLEN];
        buf[..len].copy_from_slice(&data[..len]);
        Self {
            id,
            len: len as u8,
            flags,
            data: buf,
            kind,
        }
    }

    /// Get the raw identifier including flag bits
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Get the arbitration ID (without flags)
    pub fn arbitration_id(&self) -> u32 {
        self.id & CAN_EFF_MASK
    }

    /// Check if this is an extended ID frame (29-bit)
    pub fn is_extended_id(&self) -> bool {
        (self.id & CAN_EFF_FLAG) != 0
    }

    /// Check if this is a remote transmission request
    pub fn is_remote_frame(&self) -> bool {
        (self.id & CAN_RTR_FLAG) != 0
    }

    /// Check if this is an error frame
    pub fn is_error_frame(&self) -> bool {
        (self.id & CAN_ERR_FLAG) != 0
    }

    /// Check if this is a CAN FD frame
    pub fn is_fd(&self) -> bool {
        self.kind == FrameKind::Fd
    }

    /// Check if bit rate switch is enabled
    pub fn is_brs(&self) -> bool {
        (self.flags & CANFD_BRS) != 0
    }

    /// Wire shape of this frame
    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    /// Number of meaningful payload bytes
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Check if the frame carries no payload bytes
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the meaningful payload bytes as a slice
    pub fn data(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    /// Pack the frame into a transmit buffer
    ///
    /// The buffer is sized for the largest shape and fully zero-filled before
    /// any field is written; only the first `kind().mtu()` bytes are handed
    /// to the socket. Field order and byte order match the kernel's
    /// `can_frame`/`canfd_frame` layout.
    pub fn pack(&self) -> [u8; CANFD_MTU] {
        let mut buf = [0u8; CANFD_MTU];
        buf[FRAME_ID_OFFSET..FRAME_ID_OFFSET + 4].copy_from_slice(&self.id.to_ne_bytes());
        buf[FRAME_LEN_OFFSET] = self.len;
        if self.kind == FrameKind::Fd {
            buf[FRAME_FLAGS_OFFSET] = self.flags;
        }
        buf[FRAME_DATA_OFFSET..FRAME_DATA_OFFSET + self.len as usize]
            .copy_from_slice(&self.data[..self.len as usize]);
        buf
    }

    /// Decode a frame from bytes read off the socket
    ///
    /// The kernel reports classic frames as exactly 16 bytes and FD frames
    /// as exactly 72 bytes; any other count is rejected. A length field
    /// exceeding the shape's capacity is clamped.
    pub fn from_wire(buf: &[u8]) -> Result<Self> {
        let kind = match buf.len() {
            CAN_MTU => FrameKind::Classic,
            CANFD_MTU => FrameKind::Fd,
            size => return Err(CanSockError::InvalidFrameSize { size }),
        };

        let id = u32::from_ne_bytes([
            buf[FRAME_ID_OFFSET],
            buf[FRAME_ID_OFFSET + 1],
            buf[FRAME_ID_OFFSET + 2],
            buf[FRAME_ID_OFFSET + 3],
        ]);
        let len = (buf[FRAME_LEN_OFFSET] as usize).min(kind.capacity());
        let flags = match kind {
            FrameKind::Fd => buf[FRAME_FLAGS_OFFSET],
            FrameKind::Classic => 0,
        };

        let mut data = [0u8; CANFD_MAX_DLEN];
        data[..len].copy_from_slice(&buf[FRAME_DATA_OFFSET..FRAME_DATA_OFFSET + len]);

        Ok(Self {
            id,
            len: len as u8,
            flags,
            data,
            kind,
        })
    }
}

impl std::fmt::Display for CanFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fd_indicator = if self.is_fd() { " FD" } else { "" };
        let brs_indicator = if self.is_brs() { " BRS" } else { "" };

        let data_str = if self.is_remote_frame() {
            "remote request".to_string()
        } else {
            self.data()
                .iter()
                .map(|b| format!("{:02X}", b))
                .collect::<Vec<_>>()
                .join(" ")
        };

        write!(
            f,
            "{:>8X}{}{}   [{}]  {}",
            self.arbitration_id(),
            fd_indicator,
            brs_indicator,
            self.len(),
            data_str
        )
    }
}

impl std::fmt::Debug for CanFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanFrame")
            .field("id", &format_args!("0x{:08X}", self.id))
            .field("kind", &self.kind)
            .field("len", &self.len)
            .field("flags", &format_args!("0x{:02X}", self.flags))
            .field("is_extended_id", &self.is_extended_id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_frame_creation() {
        let data = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0];
        let frame = CanFrame::with_data(0x7FF, &data);

        assert_eq!(frame.arbitration_id(), 0x7FF);
        assert!(!frame.is_extended_id());
        assert!(!frame.is_fd());
        assert_eq!(frame.len(), 8);
        assert_eq!(frame.data(), &data);
    }

    #[test]
    fn test_fd_frame_creation() {
        let data: Vec<u8> = (0..64).collect();
        let frame = CanFrame::with_fd_data(0x123 | CAN_EFF_FLAG, &data, true);

        assert_eq!(frame.arbitration_id(), 0x123);
        assert!(frame.is_extended_id());
        assert!(frame.is_fd());
        assert!(frame.is_brs());
        assert_eq!(frame.len(), 64);
    }

    #[test]
    fn test_classic_clamps_to_capacity() {
        let data: Vec<u8> = (1..=20).collect();
        let frame = CanFrame::with_data(0x100, &data);

        assert_eq!(frame.len(), CAN_MAX_DLEN);
        assert_eq!(frame.data(), &data[..CAN_MAX_DLEN]);
    }

    #[test]
    fn test_fd_clamps_to_capacity() {
        let data = vec![0xAA; 100];
        let frame = CanFrame::with_fd_data(0x100, &data, false);

        assert_eq!(frame.len(), CANFD_MAX_DLEN);
    }

    #[test]
    fn test_pack_zeroes_unused_tail() {
        let frame = CanFrame::with_data(0x123, &[1, 2, 3]);
        let buf = frame.pack();

        assert_eq!(buf[FRAME_LEN_OFFSET], 3);
        assert_eq!(&buf[FRAME_DATA_OFFSET..FRAME_DATA_OFFSET + 3], &[1, 2, 3]);
        assert!(buf[FRAME_DATA_OFFSET + 3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_pack_unpack_classic() {
        let data = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0];
        let frame = CanFrame::with_data(0x7FF, &data);

        let packed = frame.pack();
        let unpacked = CanFrame::from_wire(&packed[..CAN_MTU]).unwrap();

        assert_eq!(unpacked.id(), frame.id());
        assert_eq!(unpacked.kind(), FrameKind::Classic);
        assert_eq!(unpacked.data(), frame.data());
    }

    #[test]
    fn test_pack_unpack_fd() {
        let data: Vec<u8> = (0..48).collect();
        let frame = CanFrame::with_fd_data(0x123, &data, true);

        let packed = frame.pack();
        let unpacked = CanFrame::from_wire(&packed).unwrap();

        assert_eq!(unpacked.id(), frame.id());
        assert_eq!(unpacked.kind(), FrameKind::Fd);
        assert!(unpacked.is_brs());
        assert_eq!(unpacked.data(), frame.data());
        // Received tail beyond the meaningful length stays zero.
        assert!(unpacked.data[48..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_from_wire_rejects_odd_sizes() {
        let buf = [0u8; 20];
        match CanFrame::from_wire(&buf) {
            Err(CanSockError::InvalidFrameSize { size }) => assert_eq!(size, 20),
            other => panic!("unexpected: {:?}", other.map(|f| f.id())),
        }
    }

    #[test]
    fn test_from_wire_clamps_bogus_length() {
        let mut buf = [0u8; CAN_MTU];
        buf[FRAME_LEN_OFFSET] = 15;
        let frame = CanFrame::from_wire(&buf).unwrap();
        assert_eq!(frame.len(), CAN_MAX_DLEN);
    }

    #[test]
    fn test_envelope_sizes() {
        assert_eq!(FrameKind::Classic.mtu(), 16);
        assert_eq!(FrameKind::Fd.mtu(), 72);
        assert_eq!(FrameKind::Classic.capacity(), 8);
        assert_eq!(FrameKind::Fd.capacity(), 64);
    }
}
