//! Packet checksum
//!
//! The checksum byte (offset 6) covers the command byte and the four
//! parameter/result bytes (offsets 1..=5). The combining function is kept
//! behind [`ChecksumFn`] so framing never depends on which one the firmware
//! uses. XOR is the default (Open encodes as `F5 A0 00 00 00 00 A0 F5`);
//! swap in [`sum`] with `Codec::with_checksum` if a firmware revision adds
//! instead.

/// Checksum combining function over packet offsets 1..=5
pub type ChecksumFn = fn(&[u8]) -> u8;

/// Checksum used unless the codec is configured otherwise
pub const DEFAULT: ChecksumFn = xor;

/// XOR of all bytes
pub fn xor(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, b| acc ^ b)
}

/// Sum of all bytes modulo 256
pub fn sum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc: u8, b| acc.wrapping_add(*b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xor_reference_packets() {
        // Open
        assert_eq!(xor(&[0xA0, 0, 0, 0, 0]), 0xA0);
        // LedControl off
        assert_eq!(xor(&[0xB4, 0x01, 0, 0, 0]), 0xB5);
        // DeleteId 0x0102
        assert_eq!(xor(&[0x04, 0x01, 0x02, 0, 0]), 0x07);
    }

    #[test]
    fn test_sum_wraps() {
        assert_eq!(sum(&[0xFF, 0x02]), 0x01);
        assert_eq!(sum(&[0xA0, 0x01, 0, 0, 0]), 0xA1);
    }

    #[test]
    fn test_default_is_xor() {
        let bytes = [0x09, 0x00, 0x05, 0x00, 0x00];
        assert_eq!(DEFAULT(&bytes), xor(&bytes));
        assert_ne!(DEFAULT(&[0x01, 0, 0, 0, 0]), DEFAULT(&[0x04, 0, 0, 0, 0]));
    }

    #[test]
    fn test_checksum_empty() {
        assert_eq!(xor(&[]), 0);
        assert_eq!(sum(&[]), 0);
    }
}
