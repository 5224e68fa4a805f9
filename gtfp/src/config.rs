//! Session configuration

use std::time::Duration;

use gtfp_core::{
    checksum::{self, ChecksumFn},
    constants::{DEFAULT_TIMEOUT, ENROLL_TIMEOUT_SECONDS},
};

/// Session settings
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use gtfp::Config;
///
/// let config = Config::default()
///     .with_command_timeout(Duration::from_secs(2))
///     .with_checksum(gtfp_core::checksum::sum);
/// assert_eq!(config.command_timeout, Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Timeout for commands that do not set their own
    pub command_timeout: Duration,

    /// Timeout for commands that wait for a finger (each Enroll sample,
    /// Identify)
    pub enroll_timeout: Duration,

    /// Packet checksum function
    pub checksum: ChecksumFn,

    /// Drop stale input before each command
    pub clear_stale_input: bool,
}

impl Config {
    /// Set default command timeout
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Set per-sample enroll timeout
    pub fn with_enroll_timeout(mut self, timeout: Duration) -> Self {
        self.enroll_timeout = timeout;
        self
    }

    /// Set checksum function
    pub fn with_checksum(mut self, checksum: ChecksumFn) -> Self {
        self.checksum = checksum;
        self
    }

    /// Enable or disable draining stale input
    pub fn with_clear_stale_input(mut self, enabled: bool) -> Self {
        self.clear_stale_input = enabled;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command_timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            enroll_timeout: Duration::from_secs(ENROLL_TIMEOUT_SECONDS),
            checksum: checksum::DEFAULT,
            clear_stale_input: true,
        }
    }
}
