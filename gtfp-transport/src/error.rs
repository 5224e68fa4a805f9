//! Transport errors

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Read timeout: got {received} of {expected} bytes")]
    ReadTimeout {
        expected: usize,
        received: usize,
    },

    #[error("Connection closed by remote")]
    ConnectionClosed,

    #[error("Operation not supported by {transport}: {operation}")]
    Unsupported {
        transport: &'static str,
        operation: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl Error {
    /// Check if the error is a read deadline expiring
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ReadTimeout { .. })
    }
}
