//! # gtfp-core
//!
//! Core protocol implementation for GT-NUCL1633K1 fingerprint modules.
//!
//! This crate provides the low-level protocol primitives:
//! - Packet structure and encoding/decoding
//! - Checksum calculation
//! - Command and status definitions
//! - Typed requests and reply interpretation
//! - Secondary data block decoding
//! - Protocol constants

pub mod checksum;
pub mod command;
pub mod constants;
pub mod error;
pub mod extended;
pub mod packet;
pub mod reply;
pub mod request;
pub mod session;
pub mod status;

pub use command::Command;
pub use error::{Error, FrameError, Result};
pub use extended::{ExtendedBlock, decode_extended};
pub use packet::{Codec, Frame, Response};
pub use reply::Continuation;
pub use request::{Params, Request};
pub use session::{InFlight, SessionState, SessionTracker};
pub use status::Status;
