//! Error types for gtfp-core

use crate::{command::Command, constants::PACKET_SIZE};

/// Result type alias for gtfp-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Malformed bytes received from the module
///
/// Every variant carries the raw bytes so the caller can log or
/// resynchronize on them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Wrong number of bytes for a packet or data block
    #[error("Bad length: expected {expected} bytes, got {actual} [{}]", hex::encode(.raw))]
    BadLength {
        expected: usize,
        actual: usize,
        raw: Vec<u8>,
    },

    /// Start sentinel missing
    #[error("Bad start byte 0x{:02X} [{}]", .raw[0], hex::encode(.raw))]
    BadStart { raw: [u8; PACKET_SIZE] },

    /// End sentinel missing
    #[error("Bad end byte 0x{:02X} [{}]", .raw[PACKET_SIZE - 1], hex::encode(.raw))]
    BadEnd { raw: [u8; PACKET_SIZE] },

    /// Checksum verification failed
    #[error("Checksum mismatch: expected 0x{expected:02X}, received 0x{received:02X} [{}]", hex::encode(.raw))]
    ChecksumMismatch {
        expected: u8,
        received: u8,
        raw: [u8; PACKET_SIZE],
    },

    /// No data block layout is known for this length
    #[error("No data block layout for {0} bytes")]
    UnknownBlockLength(usize),
}

/// Core protocol errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Framing or checksum failure
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    /// Out-of-range typed argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] gtfp_types::Error),

    /// Parameter bytes a command does not accept
    #[error("Invalid parameter for {command}: {reason}")]
    InvalidParameter {
        command: Command,
        reason: String,
    },

    /// Unknown command code
    #[error("Unknown command code: 0x{0:02X}")]
    UnknownCommand(u8),

    /// Result bytes that make no sense for the command
    #[error("Invalid reply to {command}: {reason}")]
    InvalidReply {
        command: Command,
        reason: String,
    },

    /// Another command is still waiting for its response
    #[error("Session busy - a command is already in flight")]
    SessionBusy,
}

impl Error {
    /// Check if the error was raised before any byte reached the wire
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::InvalidParameter { .. } | Self::UnknownCommand(_)
        )
    }
}
