//! Command-specific interpretation of response result bytes
//!
//! These helpers only look at Q1/Q2; checking the status is up to the
//! caller.

use gtfp_types::UserId;

use crate::{
    command::Command,
    constants::{enroll, finger},
    error::{Error, Result},
    packet::Response,
};

/// Enroll continuation marker (Q1)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Continuation {
    /// Another sample is needed
    Continue,

    /// Template complete
    Final,
}

impl TryFrom<u8> for Continuation {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            enroll::CONTINUE => Ok(Self::Continue),
            enroll::FINAL => Ok(Self::Final),
            other => Err(Error::InvalidReply {
                command: Command::Enroll,
                reason: format!("unknown continuation marker 0x{other:02X}"),
            }),
        }
    }
}

/// Big-endian u16 from Q1 (high) and Q2 (low)
pub fn word(response: &Response) -> u16 {
    u16::from_be_bytes([response.q1, response.q2])
}

/// GetUserCount: number of enrolled templates
pub fn user_count(response: &Response) -> u16 {
    word(response)
}

/// GetEntryId / Identify: user ID in Q1/Q2
pub fn user_id(command: Command, response: &Response) -> Result<UserId> {
    UserId::new(word(response)).map_err(|e| Error::InvalidReply {
        command,
        reason: e.to_string(),
    })
}

/// IsPressFinger: whether a finger is on the sensor
pub fn finger_pressed(response: &Response) -> Result<bool> {
    match response.q1 {
        finger::PRESSED => Ok(true),
        finger::NOT_PRESSED => Ok(false),
        other => Err(Error::InvalidReply {
            command: Command::IsPressFinger,
            reason: format!("unknown press state 0x{other:02X}"),
        }),
    }
}

/// Enroll: continuation marker in Q1
pub fn continuation(response: &Response) -> Result<Continuation> {
    Continuation::try_from(response.q1)
}
