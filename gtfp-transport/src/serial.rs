//! Serial port transport
//!
//! Uses the blocking `serialport` crate. Each operation runs on tokio's
//! blocking pool so the async caller never stalls a runtime worker.

use std::io::{self, Read, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::BytesMut;
use parking_lot::Mutex;
use serialport::{ClearBuffer, SerialPort};
use tracing::{debug, trace, warn};

use crate::{Transport, error::*};

/// Serial transport for GT-NUCL1633K1 modules
///
/// The port sits behind a shared lock cloned into each blocking operation.
/// Dropping an in-flight future (timeout, `select!`) leaves the port in
/// place: the abandoned operation runs to its own deadline on the blocking
/// pool and the next operation waits for the lock.
///
/// # Examples
///
/// ```no_run
/// use gtfp_transport::SerialTransport;
///
/// let transport = SerialTransport::open("/dev/ttyUSB0", 115_200)?;
/// # Ok::<(), gtfp_transport::Error>(())
/// ```
pub struct SerialTransport {
    path: String,
    baud_rate: u32,
    port: Arc<Mutex<Box<dyn SerialPort>>>,
}

impl SerialTransport {
    /// Factory-default line speed of the module
    pub const DEFAULT_BAUD_RATE: u32 = 115_200;

    /// Open `path` at `baud_rate`, 8N1, no flow control
    pub fn open(path: impl Into<String>, baud_rate: u32) -> Result<Self> {
        let path = path.into();

        debug!("Opening {} at {} bps...", path, baud_rate);

        let port = serialport::new(&path, baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(Duration::from_millis(100))
            .open()?;

        debug!("Opened {}", path);

        Ok(Self {
            path,
            baud_rate,
            port: Arc::new(Mutex::new(port)),
        })
    }

    /// Wrap a port that is already open and configured
    pub fn from_port(path: impl Into<String>, port: Box<dyn SerialPort>) -> Result<Self> {
        let baud_rate = port.baud_rate()?;

        Ok(Self {
            path: path.into(),
            baud_rate,
            port: Arc::new(Mutex::new(port)),
        })
    }

    /// Current host-side line speed
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// Run `op` against the port on the blocking pool
    async fn with_port<F, R>(&self, op: F) -> Result<R>
    where
        F: FnOnce(&mut dyn SerialPort) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let port = Arc::clone(&self.port);

        tokio::task::spawn_blocking(move || {
            let mut port = port.lock();
            op(&mut **port)
        })
        .await
        .map_err(|e| Error::Io(io::Error::other(e)))?
    }
}

fn read_exact_blocking(port: &mut dyn SerialPort, len: usize, timeout: Duration) -> Result<BytesMut> {
    let deadline = Instant::now() + timeout;
    let mut buf = vec![0u8; len];
    let mut filled = 0;

    while filled < len {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(Error::ReadTimeout {
                expected: len,
                received: filled,
            });
        }

        port.set_timeout(remaining)?;

        match port.read(&mut buf[filled..]) {
            Ok(0) => return Err(Error::ConnectionClosed),
            Ok(n) => filled += n,
            Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::Interrupted) => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(BytesMut::from(&buf[..]))
}

#[async_trait]
impl Transport for SerialTransport {
    async fn write(&mut self, data: &[u8]) -> Result<()> {
        trace!("Sending {} bytes to {}: {}", data.len(), self.path, hex::encode(data));

        let data = data.to_vec();
        self.with_port(move |port| {
            port.write_all(&data)?;
            Ok(())
        })
        .await
    }

    async fn flush(&mut self) -> Result<()> {
        self.with_port(|port| {
            port.flush()?;
            Ok(())
        })
        .await
    }

    async fn read_exact(&mut self, len: usize, timeout: Duration) -> Result<BytesMut> {
        let result = self
            .with_port(move |port| read_exact_blocking(port, len, timeout))
            .await;

        match &result {
            Ok(buf) => trace!("Received {} bytes from {}: {}", len, self.path, hex::encode(buf)),
            Err(e) => warn!("Read from {} failed: {}", self.path, e),
        }

        result
    }

    async fn clear_input(&mut self) -> Result<usize> {
        self.with_port(|port| {
            let pending = port.bytes_to_read()? as usize;
            port.clear(ClearBuffer::Input)?;
            Ok(pending)
        })
        .await
    }

    async fn set_baud_rate(&mut self, bits_per_second: u32) -> Result<()> {
        self.with_port(move |port| {
            port.set_baud_rate(bits_per_second)?;
            Ok(())
        })
        .await?;

        debug!("{} now at {} bps", self.path, bits_per_second);
        self.baud_rate = bits_per_second;
        Ok(())
    }

    fn name(&self) -> String {
        self.path.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_port() {
        let result = SerialTransport::open("/dev/gtfp-does-not-exist", SerialTransport::DEFAULT_BAUD_RATE);
        assert!(matches!(result, Err(Error::Serial(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_port_survives_dropped_read() {
        let (mut module, host) = serialport::TTYPort::pair().unwrap();
        let mut transport = SerialTransport::from_port("pty", Box::new(host)).unwrap();

        let abandoned =
            tokio::time::timeout(Duration::from_millis(50), transport.read_exact(8, Duration::from_millis(300))).await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(500)).await;

        transport.write(&[0xF5, 0xA1, 0, 0, 0, 0, 0xA1, 0xF5]).await.unwrap();
        transport.flush().await.unwrap();

        module.set_timeout(Duration::from_secs(1)).unwrap();
        let mut buf = [0u8; 8];
        module.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [0xF5, 0xA1, 0, 0, 0, 0, 0xA1, 0xF5]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_clear_input_counts_stale_bytes() {
        let (mut module, host) = serialport::TTYPort::pair().unwrap();
        let mut transport = SerialTransport::from_port("pty", Box::new(host)).unwrap();

        module.write_all(&[0x00, 0xF5, 0x22]).unwrap();
        module.flush().unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(transport.clear_input().await.unwrap(), 3);
        assert_eq!(transport.clear_input().await.unwrap(), 0);
    }

    // Note: This test requires a module on this port
    // #[tokio::test]
    // async fn test_serial_round_trip() {
    //     let mut transport = SerialTransport::open("/dev/ttyUSB0", 115_200).unwrap();
    //     transport.write(&[0xF5, 0xA0, 0, 0, 0, 0, 0xA0, 0xF5]).await.unwrap();
    //     let buf = transport.read_exact(8, Duration::from_secs(1)).await.unwrap();
    //     assert_eq!(buf.len(), 8);
    // }
}
