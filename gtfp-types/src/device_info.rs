//! Device information structures

use std::fmt;

use chrono::NaiveDate;

/// Module information returned by Open when firmware info is requested
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenInfo {
    /// Device ID (always 0x01 on current firmware)
    pub device_id: u8,

    /// Firmware release day
    pub release_day: u8,

    /// Firmware release month
    pub release_month: u8,

    /// Firmware release year (full, e.g. 2021)
    pub release_year: u16,

    /// Sensor type code
    pub sensor_type: u8,
}

impl OpenInfo {
    /// Firmware release date, if the module reported a valid one
    pub fn release_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            i32::from(self.release_year),
            u32::from(self.release_month),
            u32::from(self.release_day),
        )
    }
}

impl fmt::Display for OpenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Module[ID: {}, Sensor: 0x{:02X}, FW: {:04}-{:02}-{:02}]",
            self.device_id,
            self.sensor_type,
            self.release_year,
            self.release_month,
            self.release_day
        )
    }
}

/// Firmware version block returned by GetFwVersion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareVersion {
    /// Sensor type code
    pub sensor_type: u8,

    /// Release year as reported (years since 2000)
    pub year: u8,

    pub month: u8,

    pub day: u8,

    /// Firmware version number
    pub version: u8,
}

impl FirmwareVersion {
    /// Release date, assuming the year byte counts from 2000
    pub fn release_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            2000 + i32::from(self.year),
            u32::from(self.month),
            u32::from(self.day),
        )
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FW v{} ({}-{:02}-{:02}, sensor 0x{:02X})",
            self.version,
            2000 + u16::from(self.year),
            self.month,
            self.day,
            self.sensor_type
        )
    }
}
