//! Transport over any tokio byte stream
//!
//! Works with async serial streams, TCP serial bridges (ser2net and
//! similar), or an in-memory `tokio::io::duplex` pipe.

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::{Instant, timeout, timeout_at};
use tracing::{debug, trace, warn};

use crate::{Transport, error::*};

/// Scratch size used while draining stale input
const DRAIN_CHUNK: usize = 64;

/// Stream transport
pub struct StreamTransport<S> {
    name: String,
    stream: S,
}

impl<S> StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap a connected stream
    pub fn new(name: impl Into<String>, stream: S) -> Self {
        Self {
            name: name.into(),
            stream,
        }
    }

    /// Give the stream back
    pub fn into_inner(self) -> S {
        self.stream
    }
}

#[async_trait]
impl<S> Transport for StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn write(&mut self, data: &[u8]) -> Result<()> {
        trace!("Sending {} bytes to {}: {}", data.len(), self.name, hex::encode(data));

        self.stream.write_all(data).await?;

        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        self.stream.flush().await?;
        Ok(())
    }

    async fn read_exact(&mut self, len: usize, timeout: Duration) -> Result<BytesMut> {
        let deadline = Instant::now() + timeout;
        let mut buf = BytesMut::with_capacity(len);
        let mut chunk = vec![0u8; len];

        while buf.len() < len {
            let wanted = len - buf.len();

            let n = timeout_at(deadline, self.stream.read(&mut chunk[..wanted]))
                .await
                .map_err(|_| {
                    warn!(
                        "Read timeout on {} after {:?} ({} of {} bytes)",
                        self.name,
                        timeout,
                        buf.len(),
                        len
                    );
                    Error::ReadTimeout {
                        expected: len,
                        received: buf.len(),
                    }
                })??;

            if n == 0 {
                warn!("{} closed with {} of {} bytes read", self.name, buf.len(), len);
                return Err(Error::ConnectionClosed);
            }

            buf.extend_from_slice(&chunk[..n]);
        }

        trace!("Received {} bytes from {}: {}", len, self.name, hex::encode(&buf));

        Ok(buf)
    }

    async fn clear_input(&mut self) -> Result<usize> {
        let mut scratch = [0u8; DRAIN_CHUNK];
        let mut dropped = 0;

        // Only bytes that are already buffered; never waits.
        while let Ok(read) = timeout(Duration::ZERO, self.stream.read(&mut scratch)).await {
            match read? {
                0 => break,
                n => dropped += n,
            }
        }

        if dropped > 0 {
            debug!("Discarded {} stale bytes from {}", dropped, self.name);
        }

        Ok(dropped)
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}
