//! SocketCAN protocol constants
//!
//! This module contains the constants used when talking to the kernel's raw
//! CAN sockets, including CAN ID flags and masks, payload capacities, fixed
//! envelope (MTU) sizes and the wire layout offsets shared by `can_frame`
//! and `canfd_frame`.

use std::os::raw::c_int;

// ============================================================================
// CAN ID Flags (in the CAN frame identifier)
// ============================================================================

/// Extended frame format flag (29-bit ID)
pub const CAN_EFF_FLAG: u32 = 0x8000_0000;
/// Remote transmission request flag
pub const CAN_RTR_FLAG: u32 = 0x4000_0000;
/// Error message frame flag
pub const CAN_ERR_FLAG: u32 = 0x2000_0000;

// ============================================================================
// CAN ID Masks
// ============================================================================

/// Standard frame format mask (11-bit ID)
pub const CAN_SFF_MASK: u32 = 0x0000_07FF;
/// Extended frame format mask (29-bit ID)
pub const CAN_EFF_MASK: u32 = 0x1FFF_FFFF;
/// Error mask (omit EFF, RTR, ERR flags)
pub const CAN_ERR_MASK: u32 = 0x1FFF_FFFF;

/// Number of bits in standard frame ID
pub const CAN_SFF_ID_BITS: u8 = 11;
/// Number of bits in extended frame ID
pub const CAN_EFF_ID_BITS: u8 = 29;

// ============================================================================
// CAN Payload Definitions
// ============================================================================

/// Maximum data length for classic CAN
pub const CAN_MAX_DLEN: usize = 8;
/// Maximum data length for CAN FD
pub const CANFD_MAX_DLEN: usize = 64;

// ============================================================================
// Frame Envelope Sizes
// ============================================================================

/// Fixed wire size of a classic `can_frame` (8-byte header + 8-byte data)
pub const CAN_MTU: usize = 16;
/// Fixed wire size of a `canfd_frame` (8-byte header + 64-byte data)
pub const CANFD_MTU: usize = 72;

// ============================================================================
// Frame Wire Layout (shared by can_frame and canfd_frame)
// ============================================================================

/// Byte offset of the 32-bit identifier (native byte order)
pub const FRAME_ID_OFFSET: usize = 0;
/// Byte offset of the length / DLC field
pub const FRAME_LEN_OFFSET: usize = 4;
/// Byte offset of the FD flags byte (padding in classic frames)
pub const FRAME_FLAGS_OFFSET: usize = 5;
/// Byte offset of the payload
pub const FRAME_DATA_OFFSET: usize = 8;

// ============================================================================
// CAN FD Frame Flags (canfd_frame.flags)
// ============================================================================

/// Bit rate switch (payload transmitted at the data bitrate)
pub const CANFD_BRS: u8 = 0x01;
/// Error state indicator of the transmitting node
pub const CANFD_ESI: u8 = 0x02;

// ============================================================================
// SocketCAN Address Family and Protocol (from linux/can.h)
// ============================================================================

/// CAN address family
pub const AF_CAN: c_int = 29;
/// CAN protocol family (same value as the address family)
pub const PF_CAN: c_int = 29;
/// Raw CAN protocol
pub const CAN_RAW: c_int = 1;

// ============================================================================
// Raw CAN Socket Options (from linux/can/raw.h)
// ============================================================================

/// Base option level for CAN sockets
pub const SOL_CAN_BASE: c_int = 100;
/// Option level for raw CAN sockets
pub const SOL_CAN_RAW: c_int = SOL_CAN_BASE + CAN_RAW;
/// Socket option enabling CAN FD frame reception on a raw socket
pub const CAN_RAW_FD_FRAMES: c_int = 5;
