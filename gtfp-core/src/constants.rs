//! Protocol constants

/// Start sentinel of every packet
pub const START_CODE: u8 = 0xF5;

/// End sentinel of every packet
pub const END_CODE: u8 = 0xF5;

/// Size of command and response packets
pub const PACKET_SIZE: usize = 8;

/// Default per-command timeout (seconds)
pub const DEFAULT_TIMEOUT: u64 = 5;

/// Per-sample timeout while enrolling (seconds)
pub const ENROLL_TIMEOUT_SECONDS: u64 = 8;

/// Number of captures the module needs to build a template
pub const ENROLL_SAMPLE_COUNT: u8 = 8;

/// Byte offsets within a packet
pub mod offsets {
    pub const START: usize = 0;
    pub const COMMAND: usize = 1;

    pub const P1: usize = 2;
    pub const P2: usize = 3;
    pub const P3: usize = 4;
    pub const P4: usize = 5;

    pub const Q1: usize = 2;
    pub const Q2: usize = 3;
    pub const Q3: usize = 4;
    pub const RESERVED: usize = 5;

    pub const CHECKSUM: usize = 6;
    pub const END: usize = 7;
}

/// Enroll continuation markers (Q1)
pub mod enroll {
    /// Another sample is required
    pub const CONTINUE: u8 = 0x01;

    /// Template complete
    pub const FINAL: u8 = 0x03;
}

/// Open command flags (P1)
pub mod open_flags {
    /// Plain acknowledgement
    pub const NO_DATA: u8 = 0;

    /// Acknowledgement followed by the 11-byte info block
    pub const READ_FW_INFO: u8 = 1;
}

/// IsPressFinger result values (Q1)
pub mod finger {
    pub const NOT_PRESSED: u8 = 0;
    pub const PRESSED: u8 = 1;
}

/// Open info block layout
pub mod open_info {
    pub const SIZE: usize = 11;

    pub const DEVICE_ID: usize = 0;
    pub const DAY: usize = 2;
    pub const MONTH: usize = 3;
    /// Year, little-endian u16 at offsets 4..6
    pub const YEAR: usize = 4;
    pub const SENSOR_TYPE: usize = 10;
}

/// Firmware version block layout
pub mod fw_version {
    pub const SIZE: usize = 40;

    pub const SENSOR_TYPE: usize = 0;
    pub const YEAR: usize = 12;
    pub const MONTH: usize = 13;
    pub const DAY: usize = 14;
    pub const VERSION: usize = 15;
}
