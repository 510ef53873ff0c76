//! Send One Frame
//!
//! This demo opens an endpoint on a CAN interface and transmits a single
//! classic frame, then a single CAN FD frame.
//!
//! Usage: send_one [interface]   (default: vcan0)

use cansock::{CanFrame, CanSocket};

fn main() {
    // Initialize logging
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> cansock::Result<()> {
    let interface = std::env::args().nth(1).unwrap_or_else(|| "vcan0".into());

    let mut sock = CanSocket::open(&interface)?;
    println!("Opened {}", sock);

    // Classic frame: full 8-byte payload, expect the 16-byte envelope back.
    let data: [u8; 8] = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0];
    let frame = CanFrame::with_data(0x123, &data);
    let written = sock.send_frame(&frame)?;
    println!("TX  {}  ({} bytes on the wire)", frame, written);

    // CAN FD frame: 48 payload bytes, 72-byte envelope.
    let fd_data: Vec<u8> = (0..48).collect();
    let fd_frame = CanFrame::with_fd_data(0x456, &fd_data, true);
    let written = sock.send_frame(&fd_frame)?;
    println!("TX  {}  ({} bytes on the wire)", fd_frame, written);

    Ok(())
}
