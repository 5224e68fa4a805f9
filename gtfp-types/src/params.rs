//! Validated command parameters
//!
//! Every value here is range-checked on construction, so a `Request`
//! built from them can always be put on the wire.

use std::fmt;

use crate::error::{Error, Result};

/// Fingerprint slot identifier
///
/// Travels big-endian in two parameter/result bytes (high byte first).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(u16);

impl UserId {
    /// Smallest ID the module accepts
    pub const MIN: u16 = 1;

    /// Create a user ID
    ///
    /// # Examples
    ///
    /// ```
    /// use gtfp_types::UserId;
    ///
    /// assert!(UserId::new(0).is_err());
    /// assert_eq!(UserId::new(42).unwrap().get(), 42);
    /// ```
    pub fn new(id: u16) -> Result<Self> {
        if id < Self::MIN {
            return Err(Error::UserIdOutOfRange(id));
        }
        Ok(Self(id))
    }

    /// Raw numeric value
    pub fn get(self) -> u16 {
        self.0
    }

    /// Wire representation: `[high, low]`
    pub fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    /// Parse from the `[high, low]` wire representation
    pub fn from_be_bytes(bytes: [u8; 2]) -> Result<Self> {
        Self::new(u16::from_be_bytes(bytes))
    }
}

impl TryFrom<u16> for UserId {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        Self::new(value)
    }
}

impl From<UserId> for u16 {
    fn from(id: UserId) -> u16 {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// UART speed selectable with the UartControl command
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BaudRate {
    B9600 = 1,
    B19200 = 2,
    B115200 = 3,
    B230400 = 4,
    B460800 = 5,
    B921600 = 6,
}

impl BaudRate {
    /// All supported rates, slowest first
    pub const ALL: [Self; 6] = [
        Self::B9600,
        Self::B19200,
        Self::B115200,
        Self::B230400,
        Self::B460800,
        Self::B921600,
    ];

    /// Look up a rate by its wire index (1..=6)
    pub fn from_index(index: u8) -> Result<Self> {
        match index {
            1 => Ok(Self::B9600),
            2 => Ok(Self::B19200),
            3 => Ok(Self::B115200),
            4 => Ok(Self::B230400),
            5 => Ok(Self::B460800),
            6 => Ok(Self::B921600),
            _ => Err(Error::InvalidBaudIndex(index)),
        }
    }

    /// Look up a rate by its speed in bits per second
    pub fn from_bits_per_second(bps: u32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|rate| rate.bits_per_second() == bps)
            .ok_or(Error::UnsupportedBaudRate(bps))
    }

    /// Wire index sent in P1
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn bits_per_second(self) -> u32 {
        match self {
            Self::B9600 => 9_600,
            Self::B19200 => 19_200,
            Self::B115200 => 115_200,
            Self::B230400 => 230_400,
            Self::B460800 => 460_800,
            Self::B921600 => 921_600,
        }
    }
}

impl TryFrom<u8> for BaudRate {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_index(value)
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bps", self.bits_per_second())
    }
}

/// Sensor backlight state
///
/// Note the module's inverted convention: `0` is on, `1` is off.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LedState {
    On = 0,
    Off = 1,
}

impl LedState {
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for LedState {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::On),
            1 => Ok(Self::Off),
            _ => Err(Error::InvalidLedValue(value)),
        }
    }
}
