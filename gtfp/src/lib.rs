//! # gtfp
//!
//! Host-side driver for GT-NUCL1633K1 UART fingerprint modules.
//!
//! ## Features
//!
//! - Type-safe requests and decoded responses
//! - Async/await API using Tokio
//! - One command in flight per module, with per-command timeouts
//! - Multi-sample enrollment as an explicit state machine
//! - Serial port and generic byte-stream transports
//!
//! ## Quick Start
//!
//! ```no_run
//! use gtfp::{Device, EnrollState, UserId};
//!
//! #[tokio::main]
//! async fn main() -> gtfp::Result<()> {
//!     let device = Device::open_serial("/dev/ttyUSB0", 115_200)?;
//!     device.open().await?;
//!
//!     let user_id = device.get_entry_id().await?;
//!     let state = device
//!         .enroll(user_id, |sample| println!("Place finger ({}/8)", sample + 1))
//!         .await?;
//!
//!     if let EnrollState::Completed = state {
//!         println!("Enrolled as {}", user_id);
//!     }
//!
//!     match device.identify().await? {
//!         Some(id) => println!("Matched user {}", id),
//!         None => println!("No match"),
//!     }
//!
//!     device.close().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod device;
pub mod enroll;
pub mod error;
pub mod session;

#[cfg(test)]
mod test_helpers;

// Re-exports
pub use config::Config;
pub use device::Device;
pub use enroll::{CancelHandle, EnrollState, Enrollment, FailureReason, StepOutcome};
pub use error::{Error, ProtocolError, Result};
pub use session::Session;

// Re-export protocol and transport types
pub use gtfp_core::{Command, Request, Response, Status};
pub use gtfp_transport::{SerialTransport, StreamTransport, Transport};
pub use gtfp_types::{BaudRate, FirmwareVersion, LedState, OpenInfo, UserId};
