pub type Result<T> = std::result::Result<T, Error>;

/// Argument validation errors
///
/// Raised before anything is written to the module.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("User ID {0} is below the minimum of {min}", min = crate::UserId::MIN)]
    UserIdOutOfRange(u16),

    #[error("Baud rate index {0} is not in 1..=6")]
    InvalidBaudIndex(u8),

    #[error("Unsupported baud rate: {0} bps")]
    UnsupportedBaudRate(u32),

    #[error("LED value {0} is not 0 (on) or 1 (off)")]
    InvalidLedValue(u8),
}
