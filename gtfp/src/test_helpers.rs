//! In-memory transport for unit tests

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use parking_lot::Mutex;

use gtfp_core::{Command, Frame, Status, checksum};
use gtfp_transport::{Error, Result, Transport};

#[derive(Default)]
struct Script {
    stale: Vec<u8>,
    replies: VecDeque<u8>,
    sent: Vec<Vec<u8>>,
    cleared: usize,
}

/// Transport that answers from a queue of prepared bytes
///
/// Reads never wait: if fewer bytes are queued than requested, the read
/// fails with [`Error::ReadTimeout`] straight away.
pub(crate) struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

/// View of what a [`ScriptedTransport`] saw, usable after the transport
/// has moved into a session
pub(crate) struct ScriptLog {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> (Self, ScriptLog) {
        let script = Arc::new(Mutex::new(Script::default()));
        (
            Self {
                script: Arc::clone(&script),
            },
            ScriptLog { script },
        )
    }

    /// Queue bytes to be returned by later reads
    pub(crate) fn push(&self, bytes: impl AsRef<[u8]>) {
        self.script.lock().replies.extend(bytes.as_ref());
    }

    /// Queue bytes that only `clear_input` will see
    pub(crate) fn push_stale(&self, bytes: impl AsRef<[u8]>) {
        self.script.lock().stale.extend_from_slice(bytes.as_ref());
    }
}

impl ScriptLog {
    /// Queue more replies after the transport has been handed over
    pub(crate) fn push(&self, bytes: impl AsRef<[u8]>) {
        self.script.lock().replies.extend(bytes.as_ref());
    }

    /// Every packet written so far
    pub(crate) fn sent(&self) -> Vec<Frame> {
        self.script
            .lock()
            .sent
            .iter()
            .map(|bytes| Frame::try_from(&bytes[..]).unwrap())
            .collect()
    }

    /// Command byte of every packet written so far
    pub(crate) fn sent_commands(&self) -> Vec<u8> {
        self.sent().iter().map(|frame| frame[1]).collect()
    }

    /// Reply bytes not yet read
    pub(crate) fn pending(&self) -> usize {
        self.script.lock().replies.len()
    }

    /// Stale bytes dropped by `clear_input`
    pub(crate) fn cleared(&self) -> usize {
        self.script.lock().cleared
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn write(&mut self, data: &[u8]) -> Result<()> {
        self.script.lock().sent.push(data.to_vec());
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    async fn read_exact(&mut self, len: usize, _timeout: Duration) -> Result<BytesMut> {
        let mut script = self.script.lock();

        if script.replies.len() < len {
            let received = script.replies.len();
            script.replies.clear();
            return Err(Error::ReadTimeout {
                expected: len,
                received,
            });
        }

        let bytes: Vec<u8> = script.replies.drain(..len).collect();
        Ok(BytesMut::from(&bytes[..]))
    }

    async fn clear_input(&mut self) -> Result<usize> {
        let mut script = self.script.lock();
        let dropped = script.stale.len();
        script.stale.clear();
        script.cleared += dropped;
        Ok(dropped)
    }

    fn name(&self) -> String {
        "scripted".to_string()
    }
}

/// Well-formed response packet (XOR checksum)
pub(crate) fn response_frame(command: Command, q1: u8, q2: u8, status: Status) -> Frame {
    let mut frame = [0xF5, command.into(), q1, q2, status.code(), 0x00, 0x00, 0xF5];
    frame[6] = checksum::xor(&frame[1..6]);
    frame
}
