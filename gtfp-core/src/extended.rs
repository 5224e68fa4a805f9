//! Secondary data blocks
//!
//! Open (with the read-info flag) and GetFwVersion send a fixed-length block
//! after their response packet. The block has no sentinels or checksum; it is
//! read as its own length-delimited unit and only its length is validated.

use byteorder::{ByteOrder, LittleEndian};
use gtfp_types::{FirmwareVersion, OpenInfo};

use crate::{
    constants::{fw_version, open_info},
    error::FrameError,
};

/// Decoded data block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtendedBlock {
    /// 11-byte block following Open
    OpenInfo(OpenInfo),

    /// 40-byte block following GetFwVersion
    FirmwareVersion(FirmwareVersion),
}

/// Decode a data block of `expected_len` bytes
///
/// The layout is selected by `expected_len`.
///
/// # Errors
///
/// - [`FrameError::BadLength`] if `bytes` is not `expected_len` long
/// - [`FrameError::UnknownBlockLength`] if no layout has that length
///
/// # Examples
///
/// ```
/// use gtfp_core::extended::{decode_extended, ExtendedBlock};
///
/// let mut block = [0u8; 40];
/// block[12..16].copy_from_slice(&[24, 6, 30, 3]);
///
/// match decode_extended(&block, 40).unwrap() {
///     ExtendedBlock::FirmwareVersion(fw) => assert_eq!(fw.version, 3),
///     other => panic!("unexpected block {other:?}"),
/// }
/// ```
pub fn decode_extended(bytes: &[u8], expected_len: usize) -> Result<ExtendedBlock, FrameError> {
    if bytes.len() != expected_len {
        return Err(FrameError::BadLength {
            expected: expected_len,
            actual: bytes.len(),
            raw: bytes.to_vec(),
        });
    }

    match expected_len {
        open_info::SIZE => Ok(ExtendedBlock::OpenInfo(OpenInfo {
            device_id: bytes[open_info::DEVICE_ID],
            release_day: bytes[open_info::DAY],
            release_month: bytes[open_info::MONTH],
            release_year: LittleEndian::read_u16(&bytes[open_info::YEAR..open_info::YEAR + 2]),
            sensor_type: bytes[open_info::SENSOR_TYPE],
        })),
        fw_version::SIZE => Ok(ExtendedBlock::FirmwareVersion(FirmwareVersion {
            sensor_type: bytes[fw_version::SENSOR_TYPE],
            year: bytes[fw_version::YEAR],
            month: bytes[fw_version::MONTH],
            day: bytes[fw_version::DAY],
            version: bytes[fw_version::VERSION],
        })),
        other => Err(FrameError::UnknownBlockLength(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_open_info() {
        let block = [0x01, 0x00, 15, 3, 0xE5, 0x07, 0, 0, 0, 0, 0x22];

        let decoded = decode_extended(&block, open_info::SIZE).unwrap();
        assert_eq!(
            decoded,
            ExtendedBlock::OpenInfo(OpenInfo {
                device_id: 0x01,
                release_day: 15,
                release_month: 3,
                release_year: 2021,
                sensor_type: 0x22,
            })
        );
    }

    #[test]
    fn test_decode_fw_version_field_for_field() {
        let mut block = [0xEE; fw_version::SIZE];
        block[0] = 0x07;
        block[12] = 23;
        block[13] = 11;
        block[14] = 9;
        block[15] = 4;

        let decoded = decode_extended(&block, fw_version::SIZE).unwrap();
        assert_eq!(
            decoded,
            ExtendedBlock::FirmwareVersion(FirmwareVersion {
                sensor_type: 0x07,
                year: 23,
                month: 11,
                day: 9,
                version: 4,
            })
        );
    }

    #[test]
    fn test_length_mismatch() {
        let result = decode_extended(&[0; 39], fw_version::SIZE);
        assert!(matches!(
            result,
            Err(FrameError::BadLength { expected: 40, actual: 39, .. })
        ));
    }

    #[test]
    fn test_unknown_layout() {
        let result = decode_extended(&[0; 12], 12);
        assert_eq!(result, Err(FrameError::UnknownBlockLength(12)));
    }
}
