//! Command execution over one transport
//!
//! A session owns the transport of one module and runs one command at a
//! time: encode, write, read the 8-byte response (and any data block),
//! decode. Nothing is retried here; after a timeout or frame error the byte
//! stream may be out of step and the caller decides how to recover.

use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

use gtfp_core::{
    Codec, Command, ExtendedBlock, Request, Response, SessionTracker, constants::PACKET_SIZE,
    decode_extended,
};
use gtfp_transport::Transport;

use crate::{
    config::Config,
    error::{Error, ProtocolError, Result},
};

/// Session with one module
///
/// `Session` is `Send + Sync`; share it behind an `Arc` if several tasks
/// need it. A second command issued while one is in flight fails with
/// [`Error::SessionBusy`] instead of queueing.
pub struct Session {
    transport: Mutex<Box<dyn Transport>>,
    tracker: SessionTracker,
    codec: Codec,
    config: Config,
}

impl Session {
    /// Create a session with default settings
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self::with_config(transport, Config::default())
    }

    /// Create a session with custom settings
    pub fn with_config(transport: impl Transport + 'static, config: Config) -> Self {
        Self {
            transport: Mutex::new(Box::new(transport)),
            tracker: SessionTracker::new(),
            codec: Codec::with_checksum(config.checksum),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Open/busy bookkeeping for this module
    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    /// Execute a command with the session default timeout
    pub async fn execute_default(&self, request: &Request) -> Result<Response> {
        self.execute(request, self.config.command_timeout).await
    }

    /// Execute a command and wait up to `timeout` for its response
    ///
    /// # Errors
    ///
    /// - [`Error::SessionBusy`] if another command is in flight
    /// - [`Error::Timeout`] if fewer than 8 bytes arrive in time
    /// - [`Error::Protocol`] if the response is malformed or answers a
    ///   different command
    /// - [`Error::Io`] on transport failure
    ///
    /// A failure status from the module is *not* an error here; it is
    /// returned in [`Response::status`].
    pub async fn execute(&self, request: &Request, timeout: Duration) -> Result<Response> {
        let (response, _) = self.transact(request, timeout, None).await?;
        Ok(response)
    }

    /// Execute a command whose successful response is followed by an
    /// `extended_len`-byte data block
    ///
    /// The block is read only when the response status is Success; the
    /// module sends nothing more otherwise.
    pub async fn execute_with_extended(
        &self,
        request: &Request,
        timeout: Duration,
        extended_len: usize,
    ) -> Result<(Response, Option<ExtendedBlock>)> {
        self.transact(request, timeout, Some(extended_len)).await
    }

    /// Change the host side of the link to `bits_per_second`
    pub async fn set_host_baud_rate(&self, bits_per_second: u32) -> Result<()> {
        let _in_flight = self.tracker.begin(Command::UartControl)?;
        let mut transport = self.transport.lock().await;
        transport.set_baud_rate(bits_per_second).await?;
        Ok(())
    }

    async fn transact(
        &self,
        request: &Request,
        timeout: Duration,
        extended_len: Option<usize>,
    ) -> Result<(Response, Option<ExtendedBlock>)> {
        let command = request.command();
        let _in_flight = self.tracker.begin(command)?;
        let mut transport = self.transport.lock().await;

        if self.config.clear_stale_input {
            let dropped = transport.clear_input().await?;
            if dropped > 0 {
                warn!("Dropped {} stale bytes before {}", dropped, command);
            }
        }

        let frame = self.codec.encode(request);

        debug!("Sending {} to {}", request, transport.name());
        trace!("Frame: {:02X?}", frame);

        transport.write(&frame).await?;
        transport.flush().await?;

        let buf = transport
            .read_exact(PACKET_SIZE, timeout)
            .await
            .map_err(|e| read_error(command, timeout, e))?;

        let response = self.codec.decode(&buf).map_err(|e| {
            warn!("Malformed response to {}: {}", command, e);
            ProtocolError::Frame(e)
        })?;

        if response.command != u8::from(command) {
            warn!("Response {} does not answer {}", response, command);
            return Err(ProtocolError::UnexpectedCommand {
                sent: command,
                received: response.command,
            }
            .into());
        }

        debug!("Received {}", response);

        let block = match extended_len {
            Some(len) if response.is_success() => {
                let buf = transport
                    .read_exact(len, timeout)
                    .await
                    .map_err(|e| read_error(command, timeout, e))?;

                let block = decode_extended(&buf, len).map_err(ProtocolError::Frame)?;
                debug!("Received data block {:?}", block);
                Some(block)
            }
            _ => None,
        };

        Ok((response, block))
    }
}

fn read_error(command: Command, timeout: Duration, err: gtfp_transport::Error) -> Error {
    if err.is_timeout() {
        warn!("No complete response to {} within {:?}: {}", command, timeout, err);
        Error::Timeout {
            command,
            elapsed: timeout,
        }
    } else {
        Error::Io(err)
    }
}
