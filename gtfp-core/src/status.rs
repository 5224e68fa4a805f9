//! Acknowledge (status) codes carried in Q3 of every response

use std::fmt;

/// Response status
///
/// Codes the firmware documents map to named variants; anything else is
/// kept as [`Status::Unknown`] so newer firmware never breaks decoding.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    Fail,
    /// Database full
    Full,
    /// The specified ID is not registered
    NoUser,
    /// The specified ID is already registered
    UserExist,
    /// Finger capture timed out on the module
    Timeout,
    /// Template wrong format
    WrongFormat,
    /// Current command aborted
    Break,
    InvalidParameter,
    FingerNotPressed,
    CommandNoSupport,
    EnrollOverexposure,
    /// Finger moved too little between samples
    EnrollMoveMore,
    /// Finger moved too much between samples
    EnrollMoveLess,
    /// Same finger position as an earlier sample
    EnrollDuplicate,
    FingerPressNotFull,
    EnrollPoorQuality,
    Unknown(u8),
}

impl Status {
    pub fn code(self) -> u8 {
        match self {
            Self::Success => 0x00,
            Self::Fail => 0x01,
            Self::Full => 0x04,
            Self::NoUser => 0x05,
            Self::UserExist => 0x07,
            Self::Timeout => 0x08,
            Self::WrongFormat => 0x09,
            Self::Break => 0x18,
            Self::InvalidParameter => 0xB0,
            Self::FingerNotPressed => 0xB1,
            Self::CommandNoSupport => 0xB4,
            Self::EnrollOverexposure => 0xB5,
            Self::EnrollMoveMore => 0xB6,
            Self::EnrollMoveLess => 0xB7,
            Self::EnrollDuplicate => 0xB8,
            Self::FingerPressNotFull => 0xB9,
            Self::EnrollPoorQuality => 0xBA,
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Capture problems the user can fix by presenting the finger again
    pub fn is_enroll_quality_failure(self) -> bool {
        matches!(
            self,
            Self::Timeout
                | Self::EnrollOverexposure
                | Self::EnrollMoveMore
                | Self::EnrollMoveLess
                | Self::EnrollDuplicate
                | Self::FingerPressNotFull
                | Self::EnrollPoorQuality
        )
    }

    /// Get status name
    pub fn name(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Fail => "Fail",
            Self::Full => "Full",
            Self::NoUser => "NoUser",
            Self::UserExist => "UserExist",
            Self::Timeout => "Timeout",
            Self::WrongFormat => "WrongFormat",
            Self::Break => "Break",
            Self::InvalidParameter => "InvalidParameter",
            Self::FingerNotPressed => "FingerNotPressed",
            Self::CommandNoSupport => "CommandNoSupport",
            Self::EnrollOverexposure => "EnrollOverexposure",
            Self::EnrollMoveMore => "EnrollMoveMore",
            Self::EnrollMoveLess => "EnrollMoveLess",
            Self::EnrollDuplicate => "EnrollDuplicate",
            Self::FingerPressNotFull => "FingerPressNotFull",
            Self::EnrollPoorQuality => "EnrollPoorQuality",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl From<u8> for Status {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Self::Success,
            0x01 => Self::Fail,
            0x04 => Self::Full,
            0x05 => Self::NoUser,
            0x07 => Self::UserExist,
            0x08 => Self::Timeout,
            0x09 => Self::WrongFormat,
            0x18 => Self::Break,
            0xB0 => Self::InvalidParameter,
            0xB1 => Self::FingerNotPressed,
            0xB4 => Self::CommandNoSupport,
            0xB5 => Self::EnrollOverexposure,
            0xB6 => Self::EnrollMoveMore,
            0xB7 => Self::EnrollMoveLess,
            0xB8 => Self::EnrollDuplicate,
            0xB9 => Self::FingerPressNotFull,
            0xBA => Self::EnrollPoorQuality,
            raw => Self::Unknown(raw),
        }
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> u8 {
        status.code()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), self.code())
    }
}
