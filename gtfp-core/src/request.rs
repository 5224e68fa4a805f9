//! Typed command requests
//!
//! Each request knows its command code and how its arguments map onto the
//! four parameter bytes:
//!
//! ```text
//! Open          P1 = flag (0 = ack only, 1 = ack + 11-byte info block)
//! UartControl   P1 = baud index (1..=6)
//! LedControl    P1 = 0 (on) / 1 (off)
//! Enroll        P1..P2 = user ID (big-endian), P3 = sample index
//! DeleteId      P1..P2 = user ID (big-endian)
//! everything else: all zero
//! ```

use std::fmt;

use gtfp_types::{BaudRate, LedState, UserId};

use crate::{
    command::Command,
    constants::{ENROLL_SAMPLE_COUNT, fw_version, open_flags, open_info},
    error::{Error, Result},
};

/// Parameter bytes P1..=P4
pub type Params = [u8; 4];

/// A command with its validated arguments
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Request {
    Open { read_info: bool },
    Close,
    UartControl(BaudRate),
    LedControl(LedState),
    IsPressFinger,
    Enroll { user_id: UserId, sample: u8 },
    DeleteId(UserId),
    DeleteAll,
    GetUserCount,
    Identify,
    GetEntryId,
    GetFwVersion,
    EnrollCancel,
}

impl Request {
    /// Build an Enroll request, checking the sample index
    pub fn enroll(user_id: UserId, sample: u8) -> Result<Self> {
        check_sample(sample)?;
        Ok(Self::Enroll { user_id, sample })
    }

    /// Command code sent in byte 1
    pub fn command(&self) -> Command {
        match self {
            Self::Open { .. } => Command::Open,
            Self::Close => Command::Close,
            Self::UartControl(_) => Command::UartControl,
            Self::LedControl(_) => Command::LedControl,
            Self::IsPressFinger => Command::IsPressFinger,
            Self::Enroll { .. } => Command::Enroll,
            Self::DeleteId(_) => Command::DeleteId,
            Self::DeleteAll => Command::DeleteAll,
            Self::GetUserCount => Command::GetUserCount,
            Self::Identify => Command::Identify,
            Self::GetEntryId => Command::GetEntryId,
            Self::GetFwVersion => Command::GetFwVersion,
            Self::EnrollCancel => Command::EnrollCancel,
        }
    }

    /// Parameter bytes P1..=P4
    pub fn params(&self) -> Params {
        match *self {
            Self::Open { read_info } => {
                let flag = if read_info {
                    open_flags::READ_FW_INFO
                } else {
                    open_flags::NO_DATA
                };
                [flag, 0, 0, 0]
            }
            Self::UartControl(rate) => [rate.index(), 0, 0, 0],
            Self::LedControl(state) => [state.value(), 0, 0, 0],
            Self::Enroll { user_id, sample } => {
                let [hi, lo] = user_id.to_be_bytes();
                [hi, lo, sample, 0]
            }
            Self::DeleteId(user_id) => {
                let [hi, lo] = user_id.to_be_bytes();
                [hi, lo, 0, 0]
            }
            Self::Close
            | Self::IsPressFinger
            | Self::DeleteAll
            | Self::GetUserCount
            | Self::Identify
            | Self::GetEntryId
            | Self::GetFwVersion
            | Self::EnrollCancel => [0; 4],
        }
    }

    /// Length of the data block that follows a successful response, if any
    pub fn extended_len(&self) -> Option<usize> {
        match self {
            Self::Open { read_info: true } => Some(open_info::SIZE),
            Self::GetFwVersion => Some(fw_version::SIZE),
            _ => None,
        }
    }

    /// Rebuild a request from raw parameter bytes
    ///
    /// Rejects anything the typed constructors would reject, plus non-zero
    /// bytes in positions the command does not use.
    ///
    /// # Examples
    ///
    /// ```
    /// use gtfp_core::{Command, Request};
    ///
    /// assert!(Request::from_raw(Command::LedControl, [1, 0, 0, 0]).is_ok());
    /// assert!(Request::from_raw(Command::LedControl, [2, 0, 0, 0]).is_err());
    /// assert!(Request::from_raw(Command::UartControl, [7, 0, 0, 0]).is_err());
    /// ```
    pub fn from_raw(command: Command, params: Params) -> Result<Self> {
        let [p1, p2, p3, p4] = params;

        let request = match command {
            Command::Open => {
                unused(command, &[p2, p3, p4])?;
                match p1 {
                    open_flags::NO_DATA => Self::Open { read_info: false },
                    open_flags::READ_FW_INFO => Self::Open { read_info: true },
                    other => {
                        return Err(Error::InvalidParameter {
                            command,
                            reason: format!("unknown flag {other}"),
                        });
                    }
                }
            }
            Command::UartControl => {
                unused(command, &[p2, p3, p4])?;
                Self::UartControl(BaudRate::from_index(p1)?)
            }
            Command::LedControl => {
                unused(command, &[p2, p3, p4])?;
                Self::LedControl(LedState::try_from(p1)?)
            }
            Command::Enroll => {
                unused(command, &[p4])?;
                Self::enroll(UserId::from_be_bytes([p1, p2])?, p3)?
            }
            Command::DeleteId => {
                unused(command, &[p3, p4])?;
                Self::DeleteId(UserId::from_be_bytes([p1, p2])?)
            }
            Command::Close => no_params(command, params, Self::Close)?,
            Command::IsPressFinger => no_params(command, params, Self::IsPressFinger)?,
            Command::DeleteAll => no_params(command, params, Self::DeleteAll)?,
            Command::GetUserCount => no_params(command, params, Self::GetUserCount)?,
            Command::Identify => no_params(command, params, Self::Identify)?,
            Command::GetEntryId => no_params(command, params, Self::GetEntryId)?,
            Command::GetFwVersion => no_params(command, params, Self::GetFwVersion)?,
            Command::EnrollCancel => no_params(command, params, Self::EnrollCancel)?,
        };

        Ok(request)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { read_info } => write!(f, "Open(read_info={read_info})"),
            Self::UartControl(rate) => write!(f, "UART Control({rate})"),
            Self::LedControl(state) => write!(f, "LED Control({state:?})"),
            Self::Enroll { user_id, sample } => write!(f, "Enroll(user={user_id}, sample={sample})"),
            Self::DeleteId(user_id) => write!(f, "DeleteID({user_id})"),
            other => f.write_str(other.command().name()),
        }
    }
}

fn check_sample(sample: u8) -> Result<()> {
    if sample >= ENROLL_SAMPLE_COUNT {
        return Err(Error::InvalidParameter {
            command: Command::Enroll,
            reason: format!("sample index {sample} outside 0..{ENROLL_SAMPLE_COUNT}"),
        });
    }
    Ok(())
}

fn unused(command: Command, bytes: &[u8]) -> Result<()> {
    if bytes.iter().any(|b| *b != 0) {
        return Err(Error::InvalidParameter {
            command,
            reason: "unused parameter bytes must be zero".into(),
        });
    }
    Ok(())
}

fn no_params(command: Command, params: Params, request: Request) -> Result<Request> {
    unused(command, &params)?;
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn user(id: u16) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn test_user_id_layout() {
        let request = Request::DeleteId(user(0x1234));
        assert_eq!(request.params(), [0x12, 0x34, 0, 0]);

        let request = Request::enroll(user(0x0203), 5).unwrap();
        assert_eq!(request.params(), [0x02, 0x03, 5, 0]);
    }

    #[test]
    fn test_open_flag() {
        assert_eq!(Request::Open { read_info: true }.params(), [1, 0, 0, 0]);
        assert_eq!(Request::Open { read_info: false }.params(), [0, 0, 0, 0]);
        assert!(Request::from_raw(Command::Open, [2, 0, 0, 0]).is_err());
    }

    #[test]
    fn test_led_rejects_out_of_range() {
        for value in 2..=u8::MAX {
            let result = Request::from_raw(Command::LedControl, [value, 0, 0, 0]);
            assert_eq!(
                result,
                Err(Error::InvalidArgument(gtfp_types::Error::InvalidLedValue(value)))
            );
        }
    }

    #[test]
    fn test_baud_rejects_out_of_range() {
        for index in [0u8, 7, 8, 0xFF] {
            let result = Request::from_raw(Command::UartControl, [index, 0, 0, 0]);
            assert_eq!(
                result,
                Err(Error::InvalidArgument(gtfp_types::Error::InvalidBaudIndex(index)))
            );
        }
    }

    #[test]
    fn test_user_id_minimum_enforced() {
        let result = Request::from_raw(Command::DeleteId, [0, 0, 0, 0]);
        assert!(result.unwrap_err().is_argument_error());
    }

    #[test]
    fn test_enroll_sample_range() {
        assert!(Request::enroll(user(1), ENROLL_SAMPLE_COUNT - 1).is_ok());
        assert!(Request::enroll(user(1), ENROLL_SAMPLE_COUNT).is_err());
    }

    #[test]
    fn test_unused_bytes_rejected() {
        assert!(Request::from_raw(Command::Close, [0, 0, 0, 1]).is_err());
        assert!(Request::from_raw(Command::DeleteId, [0, 1, 1, 0]).is_err());
    }

    #[test]
    fn test_from_raw_matches_params() {
        let requests = [
            Request::Open { read_info: true },
            Request::UartControl(BaudRate::B115200),
            Request::LedControl(LedState::Off),
            Request::enroll(user(300), 7).unwrap(),
            Request::DeleteId(user(9)),
            Request::GetFwVersion,
            Request::EnrollCancel,
        ];

        for request in requests {
            let rebuilt = Request::from_raw(request.command(), request.params()).unwrap();
            assert_eq!(rebuilt, request);
        }
    }

    #[test]
    fn test_extended_len() {
        assert_eq!(Request::Open { read_info: true }.extended_len(), Some(11));
        assert_eq!(Request::Open { read_info: false }.extended_len(), None);
        assert_eq!(Request::GetFwVersion.extended_len(), Some(40));
        assert_eq!(Request::Identify.extended_len(), None);
    }
}
