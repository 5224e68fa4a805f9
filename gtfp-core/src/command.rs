//! GT-NUCL1633K1 command codes

use std::fmt;

use crate::error::{Error, Result};

/// Protocol command codes
///
/// All commands from the GT-NUCL1633K1 Programming Guide. The same byte is
/// echoed back in the response packet.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    // Module control
    Open = 0xA0,
    Close = 0xA1,
    UartControl = 0xA3,
    LedControl = 0xB4,
    IsPressFinger = 0xB5,

    // Enrollment
    Enroll = 0x01,
    EnrollCancel = 0x92,

    // Database
    DeleteId = 0x04,
    DeleteAll = 0x05,
    GetUserCount = 0x09,
    GetEntryId = 0x0D,

    // Matching
    Identify = 0x0C,

    // Device information
    GetFwVersion = 0x26,
}

impl Command {
    /// Every command, in wire-code order
    pub const ALL: [Self; 13] = [
        Self::Enroll,
        Self::DeleteId,
        Self::DeleteAll,
        Self::GetUserCount,
        Self::Identify,
        Self::GetEntryId,
        Self::GetFwVersion,
        Self::EnrollCancel,
        Self::Open,
        Self::Close,
        Self::UartControl,
        Self::LedControl,
        Self::IsPressFinger,
    ];

    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Close => "Close",
            Self::UartControl => "UART Control",
            Self::LedControl => "LED Control",
            Self::IsPressFinger => "IsPressFinger",
            Self::Enroll => "Enroll",
            Self::DeleteId => "DeleteID",
            Self::DeleteAll => "DeleteAll",
            Self::GetUserCount => "GetUserCount",
            Self::Identify => "Identify",
            Self::GetEntryId => "GetEntryID",
            Self::GetFwVersion => "GetFWVersion",
            Self::EnrollCancel => "EnrollCancel",
        }
    }
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> u8 {
        cmd as u8
    }
}

impl TryFrom<u8> for Command {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0xA0 => Ok(Self::Open),
            0xA1 => Ok(Self::Close),
            0xA3 => Ok(Self::UartControl),
            0xB4 => Ok(Self::LedControl),
            0xB5 => Ok(Self::IsPressFinger),
            0x01 => Ok(Self::Enroll),
            0x04 => Ok(Self::DeleteId),
            0x05 => Ok(Self::DeleteAll),
            0x09 => Ok(Self::GetUserCount),
            0x0C => Ok(Self::Identify),
            0x0D => Ok(Self::GetEntryId),
            0x26 => Ok(Self::GetFwVersion),
            0x92 => Ok(Self::EnrollCancel),
            _ => Err(Error::UnknownCommand(value)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}
