//! Type definitions for gtfp

pub mod device_info;
pub mod error;
pub mod params;

pub use device_info::{FirmwareVersion, OpenInfo};
pub use error::{Error, Result};
pub use params::{BaudRate, LedState, UserId};
