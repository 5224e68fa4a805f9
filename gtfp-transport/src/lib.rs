//! Transport layer for GT-NUCL1633K1 modules
//!
//! The protocol engine only needs to write bytes and read an exact number
//! of bytes before a deadline. Opening and configuring the port is the
//! adapter's job.

pub mod error;
pub mod serial;
pub mod stream;

pub use error::{Error, Result};
pub use serial::SerialTransport;
pub use stream::StreamTransport;

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;

/// Byte-stream transport to one module
#[async_trait]
pub trait Transport: Send {
    /// Write all of `data`
    async fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Flush buffered output
    async fn flush(&mut self) -> Result<()>;

    /// Read exactly `len` bytes, failing with [`Error::ReadTimeout`] if they
    /// have not all arrived within `timeout`
    async fn read_exact(&mut self, len: usize, timeout: Duration) -> Result<BytesMut>;

    /// Discard any bytes already received but not read
    ///
    /// Returns the number of bytes dropped, if known.
    async fn clear_input(&mut self) -> Result<usize>;

    /// Change the host-side line speed
    async fn set_baud_rate(&mut self, _bits_per_second: u32) -> Result<()> {
        Err(Error::Unsupported {
            transport: "transport",
            operation: "set_baud_rate",
        })
    }

    /// Human-readable endpoint name for logs
    fn name(&self) -> String;
}
