//! Binary MC protocol codec.
//!
//! Requests are 12 packed little-endian bytes:
//!
//! | Offset | Size | Field |
//! |:------:|:----:|-------|
//! | 0 | 1 | Command (`0x01` word read) |
//! | 1 | 1 | PC number (`0xFF`) |
//! | 2 | 2 | Monitoring timer (`0x000A`) |
//! | 4 | 2 | Device code |
//! | 6 | 4 | Head address |
//! | 10 | 2 | Point count |
//!
//! Responses carry a little-endian completion code at offset 2. Word data is
//! read from offset 2 as well, so the first returned word always overlaps the
//! completion field.
//!
//! Only word reads are implemented; binary support depends on the adapter's
//! firmware and settings.

use crate::codec::{device_code, Codec, Encoding, CMD_READ_WORDS, MONITOR_TIMER, PC_NO};
use crate::device::Device;
use crate::error::{McError, Result};

/// Size of a binary read request in bytes.
pub const BINARY_REQUEST_SIZE: usize = 12;

/// Minimum response size: subheader (2) + completion code (2).
const MIN_RESPONSE_SIZE: usize = 4;

/// Offset of the completion code.
const COMPLETION_OFFSET: usize = 2;

// FIXME: word data starts at the completion offset, so the first word always
// reads the completion field. Confirm against an adapter capture before moving it.
const DATA_OFFSET: usize = 2;

/// Binary MC protocol codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCodec;

impl BinaryCodec {
    fn check_completion(frame: &[u8]) -> Result<()> {
        if frame.len() < MIN_RESPONSE_SIZE {
            return Err(McError::invalid_response(format!(
                "binary response too short: expected at least {} bytes, got {}",
                MIN_RESPONSE_SIZE,
                frame.len()
            )));
        }

        let completion =
            u16::from_le_bytes([frame[COMPLETION_OFFSET], frame[COMPLETION_OFFSET + 1]]);
        if completion != 0 {
            return Err(McError::plc_error(completion));
        }
        Ok(())
    }
}

impl Codec for BinaryCodec {
    fn encoding(&self) -> Encoding {
        Encoding::Binary
    }

    fn supports_bits(&self) -> bool {
        false
    }

    fn supports_writes(&self) -> bool {
        false
    }

    fn build_read_words(&self, device: Device, start: u32, count: usize) -> Result<Vec<u8>> {
        let code = device_code(device, Encoding::Binary)?;
        let count = u16::try_from(count).map_err(|_| {
            McError::invalid_parameter("count", format!("must not exceed {}", u16::MAX))
        })?;

        let mut frame = Vec::with_capacity(BINARY_REQUEST_SIZE);
        frame.push(CMD_READ_WORDS);
        frame.push(PC_NO);
        frame.extend_from_slice(&MONITOR_TIMER.to_le_bytes());
        frame.extend_from_slice(&code.to_le_bytes());
        frame.extend_from_slice(&start.to_le_bytes());
        frame.extend_from_slice(&count.to_le_bytes());
        Ok(frame)
    }

    fn parse_read_words(&self, frame: &[u8], count: usize) -> Result<Vec<u16>> {
        Self::check_completion(frame)?;

        let needed = count
            .checked_mul(2)
            .and_then(|n| n.checked_add(DATA_OFFSET))
            .ok_or_else(|| {
                McError::invalid_parameter("count", format!("{} words overflow", count))
            })?;
        if frame.len() < needed {
            return Err(McError::invalid_response(format!(
                "expected {} bytes for {} words, got {}",
                needed,
                count,
                frame.len()
            )));
        }

        Ok(frame[DATA_OFFSET..needed]
            .chunks_exact(2)
            .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
            .collect())
    }

    fn parse_write_response(&self, frame: &[u8]) -> Result<()> {
        Self::check_completion(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_read_words() {
        let frame = BinaryCodec.build_read_words(Device::D, 100, 3).unwrap();
        assert_eq!(frame.len(), BINARY_REQUEST_SIZE);
        assert_eq!(frame, hex::decode("01ff0a002044640000000300").unwrap());
    }

    #[test]
    fn test_build_read_words_large_address() {
        let frame = BinaryCodec.build_read_words(Device::M, 0x0102_0304, 0x1234).unwrap();
        assert_eq!(frame, hex::decode("01ff0a00204d040302013412").unwrap());
    }

    #[test]
    fn test_build_count_limit() {
        assert!(BinaryCodec.build_read_words(Device::D, 0, 65535).is_ok());
        assert!(matches!(
            BinaryCodec.build_read_words(Device::D, 0, 65536),
            Err(McError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_build_unsupported_device() {
        assert!(matches!(
            BinaryCodec.build_read_words(Device::CN, 0, 1),
            Err(McError::UnsupportedDevice { .. })
        ));
    }

    #[test]
    fn test_bits_and_writes_unsupported() {
        assert!(matches!(
            BinaryCodec.build_read_bits(Device::M, 0, 1),
            Err(McError::Unsupported { operation: "bit read", encoding: "binary" })
        ));
        assert!(matches!(
            BinaryCodec.parse_read_bits(&[0; 8], 1),
            Err(McError::Unsupported { .. })
        ));
        assert!(matches!(
            BinaryCodec.build_write_words(Device::D, 0, &[1]),
            Err(McError::Unsupported { operation: "word write", .. })
        ));
        assert!(matches!(
            BinaryCodec.build_write_bits(Device::M, 0, &[true]),
            Err(McError::Unsupported { operation: "bit write", .. })
        ));
    }

    #[test]
    fn test_parse_read_words_overlaps_completion() {
        let response = hex::decode("8100000034127856").unwrap();
        let values = BinaryCodec.parse_read_words(&response, 3).unwrap();
        // The first word is the completion field itself
        assert_eq!(values, vec![0x0000, 0x1234, 0x5678]);
    }

    #[test]
    fn test_parse_completion_error() {
        let response = hex::decode("8100 51c0 3412".replace(' ', "")).unwrap();
        let err = BinaryCodec.parse_read_words(&response, 2).unwrap_err();
        assert!(matches!(err, McError::PlcError { code: 0xC051 }));
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            BinaryCodec.parse_read_words(&[0x81, 0x00, 0x00], 1),
            Err(McError::InvalidResponse { .. })
        ));
        assert!(matches!(
            BinaryCodec.parse_read_words(&[0x81, 0x00, 0x00, 0x00], 2),
            Err(McError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_parse_huge_count() {
        for count in [usize::MAX / 2, usize::MAX] {
            assert!(matches!(
                BinaryCodec.parse_read_words(&[0x81, 0x00, 0x00, 0x00], count),
                Err(McError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn test_parse_write_response() {
        assert!(BinaryCodec.parse_write_response(&[0x83, 0x00, 0x00, 0x00]).is_ok());
        assert!(matches!(
            BinaryCodec.parse_write_response(&[0x83, 0x00, 0x5b, 0x00]),
            Err(McError::PlcError { code: 0x5B })
        ));
    }
}
