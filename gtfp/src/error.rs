//! High-level error types

use std::time::Duration;

use gtfp_core::{Command, FrameError, Status};

pub type Result<T> = std::result::Result<T, Error>;

/// Well-formed bytes that do not fit the exchange in progress
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("{0}")]
    Frame(#[from] FrameError),

    #[error("Sent {sent} but the response echoes command 0x{received:02X}")]
    UnexpectedCommand { sent: Command, received: u8 },

    #[error("Enroll reported final after {collected} of {expected} samples")]
    EarlyFinal { collected: u8, expected: u8 },

    #[error("Enroll still asked for samples after all {expected} were taken")]
    MissingFinal { expected: u8 },

    #[error("Invalid reply to {command}: {reason}")]
    InvalidReply { command: Command, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Transport error: {0}")]
    Io(#[from] gtfp_transport::Error),

    #[error("Timeout waiting for {command} response after {elapsed:?}")]
    Timeout { command: Command, elapsed: Duration },

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("{command} failed on the module: {status}")]
    Device { command: Command, status: Status },

    #[error("Invalid argument: {0}")]
    InvalidArgument(#[source] gtfp_core::Error),

    #[error("Session busy - another command is in flight")]
    SessionBusy,

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl Error {
    /// Check if error is recoverable (retry might succeed)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Device { .. } | Self::SessionBusy | Self::Protocol(_)
        )
    }

    /// Check if the byte stream may be out of step with packet boundaries
    ///
    /// The caller should discard input up to the next sentinel (or clear the
    /// port) before the next command.
    pub fn requires_resync(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Protocol(ProtocolError::Frame(_)))
    }

    /// Device status, if the module answered with a failure
    pub fn status(&self) -> Option<Status> {
        match self {
            Self::Device { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<gtfp_core::Error> for Error {
    fn from(err: gtfp_core::Error) -> Self {
        match err {
            gtfp_core::Error::Frame(frame) => Self::Protocol(ProtocolError::Frame(frame)),
            gtfp_core::Error::InvalidReply { command, reason } => {
                Self::Protocol(ProtocolError::InvalidReply { command, reason })
            }
            gtfp_core::Error::SessionBusy => Self::SessionBusy,
            other => Self::InvalidArgument(other),
        }
    }
}

impl From<gtfp_types::Error> for Error {
    fn from(err: gtfp_types::Error) -> Self {
        Self::InvalidArgument(gtfp_core::Error::InvalidArgument(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        let busy: Error = gtfp_core::Error::SessionBusy.into();
        assert!(matches!(busy, Error::SessionBusy));

        let arg: Error = gtfp_types::Error::InvalidLedValue(3).into();
        assert!(matches!(arg, Error::InvalidArgument(_)));

        let frame: Error = gtfp_core::Error::Frame(FrameError::UnknownBlockLength(3)).into();
        assert!(frame.requires_resync());
    }

    #[test]
    fn test_device_status() {
        let err = Error::Device {
            command: Command::DeleteId,
            status: Status::NoUser,
        };
        assert_eq!(err.status(), Some(Status::NoUser));
        assert!(err.is_recoverable());
        assert!(!err.requires_resync());
        assert_eq!(err.to_string(), "DeleteID(0x04) failed on the module: NoUser(0x05)");
    }
}
