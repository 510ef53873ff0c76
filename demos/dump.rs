//! Frame Dump
//!
//! This demo opens an endpoint on a CAN interface and prints every frame it
//! receives, using the time-bounded receive so the loop stays responsive.
//!
//! Usage: dump [interface]   (default: vcan0)

use std::time::Duration;

use cansock::{CanSockError, CanSocket};

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
    println!("Listening on {} (press Ctrl+C to stop)...\n", interface);

    loop {
        match sock.receive_timeout(Duration::from_millis(100)) {
            Ok(frame) => println!("RX  {}", frame),
            Err(CanSockError::ReadTimeout) => continue,
            Err(e) => return Err(e),
        }
    }
}
