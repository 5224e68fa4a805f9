//! GT-NUCL1633K1 packet structure and encoding/decoding

use std::fmt;

use tracing::trace;

use crate::{
    checksum::{self, ChecksumFn},
    command::Command,
    constants::{END_CODE, PACKET_SIZE, START_CODE, offsets},
    error::{FrameError, Result},
    request::{Params, Request},
    status::Status,
};

/// Raw 8-byte packet
pub type Frame = [u8; PACKET_SIZE];

/// Decoded response packet
///
/// # Packet Structure
///
/// ```text
/// ┌───────┬─────────┬──────┬──────┬──────┬──────────┬──────────┬───────┐
/// │ Start │ Command │  Q1  │  Q2  │  Q3  │ Reserved │ Checksum │  End  │
/// │ 0xF5  │ (echo)  │      │      │status│          │ XOR 1..5 │ 0xF5  │
/// └───────┴─────────┴──────┴──────┴──────┴──────────┴──────────┴───────┘
/// ```
///
/// Command packets share the layout with P1..P4 in place of
/// Q1..Reserved. What Q1 and Q2 mean depends on the command; see
/// [`crate::reply`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Response {
    /// Raw command byte echoed by the module
    pub command: u8,

    pub q1: u8,
    pub q2: u8,
    pub q3: u8,
    pub reserved: u8,

    /// Status decoded from Q3
    pub status: Status,
}

impl Response {
    /// Echoed command, if it is one we know
    pub fn command_code(&self) -> Option<Command> {
        Command::try_from(self.command).ok()
    }

    /// Q1..Q3 followed by the reserved byte, in wire order
    pub fn data(&self) -> Params {
        [self.q1, self.q2, self.q3, self.reserved]
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("command", &format!("0x{:02X}", self.command))
            .field("q1", &format!("0x{:02X}", self.q1))
            .field("q2", &format!("0x{:02X}", self.q2))
            .field("status", &self.status)
            .finish()
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.command_code() {
            Some(command) => write!(f, "Response[{}]", command.name())?,
            None => write!(f, "Response[0x{:02X}]", self.command)?,
        }
        write!(f, "(status={}, q1=0x{:02X}, q2=0x{:02X})", self.status, self.q1, self.q2)
    }
}

/// Packet codec
///
/// Pure framing: no I/O and no knowledge of which command a response
/// answers. The checksum function is pluggable.
///
/// # Examples
///
/// ```
/// use gtfp_core::{Codec, Request, Status};
///
/// let codec = Codec::new();
/// let frame = codec.encode(&Request::Open { read_info: false });
/// assert_eq!(frame, [0xF5, 0xA0, 0x00, 0x00, 0x00, 0x00, 0xA0, 0xF5]);
///
/// let response = codec.decode(&frame).unwrap();
/// assert_eq!(response.status, Status::Success);
/// ```
#[derive(Clone, Copy)]
pub struct Codec {
    checksum: ChecksumFn,
}

impl Codec {
    /// Create a codec using the default checksum
    pub fn new() -> Self {
        Self {
            checksum: checksum::DEFAULT,
        }
    }

    /// Create a codec with a different checksum function
    pub fn with_checksum(checksum: ChecksumFn) -> Self {
        Self { checksum }
    }

    /// Checksum over offsets 1..=5 of `frame`
    pub fn checksum(&self, frame: &Frame) -> u8 {
        let covered = &frame[offsets::COMMAND..offsets::CHECKSUM];
        let checksum = (self.checksum)(covered);

        trace!(
            bytes = %hex::encode(covered),
            checksum = format!("0x{:02X}", checksum),
            "Calculated checksum"
        );

        checksum
    }

    /// Encode a typed request
    pub fn encode(&self, request: &Request) -> Frame {
        self.frame(request.command().into(), request.params())
    }

    /// Encode a command from raw parameter bytes
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument`/`InvalidParameter` if the bytes are out of
    /// range for the command. Nothing is produced in that case.
    pub fn encode_raw(&self, command: Command, params: Params) -> Result<Frame> {
        let request = Request::from_raw(command, params)?;
        Ok(self.encode(&request))
    }

    fn frame(&self, command: u8, params: Params) -> Frame {
        let [p1, p2, p3, p4] = params;
        let mut frame = [START_CODE, command, p1, p2, p3, p4, 0, END_CODE];
        frame[offsets::CHECKSUM] = self.checksum(&frame);

        trace!(frame = %hex::encode(frame), "Encoded packet");

        frame
    }

    /// Decode a response packet
    ///
    /// Checks, in order: length, start sentinel, end sentinel, checksum.
    /// The first failure is returned.
    ///
    /// # Errors
    ///
    /// Returns a [`FrameError`] carrying the raw bytes.
    pub fn decode(&self, buf: &[u8]) -> std::result::Result<Response, FrameError> {
        let raw: Frame = buf.try_into().map_err(|_| FrameError::BadLength {
            expected: PACKET_SIZE,
            actual: buf.len(),
            raw: buf.to_vec(),
        })?;

        if raw[offsets::START] != START_CODE {
            return Err(FrameError::BadStart { raw });
        }

        if raw[offsets::END] != END_CODE {
            return Err(FrameError::BadEnd { raw });
        }

        let expected = self.checksum(&raw);
        let received = raw[offsets::CHECKSUM];
        if expected != received {
            return Err(FrameError::ChecksumMismatch {
                expected,
                received,
                raw,
            });
        }

        trace!(frame = %hex::encode(raw), "Decoded packet");

        Ok(Response {
            command: raw[offsets::COMMAND],
            q1: raw[offsets::Q1],
            q2: raw[offsets::Q2],
            q3: raw[offsets::Q3],
            reserved: raw[offsets::RESERVED],
            status: Status::from(raw[offsets::Q3]),
        })
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec").finish_non_exhaustive()
    }
}
