//! Protocol codec abstraction.
//!
//! A [`Codec`] turns batch read/write requests into MC protocol frames and
//! parses the PLC's answers. Two encodings exist:
//!
//! | Encoding | Type | Word read | Bit read | Writes |
//! |----------|------|:---------:|:--------:|:------:|
//! | [`Encoding::Ascii`] | [`AsciiCodec`] | ✓ | ✓ | ✓ |
//! | [`Encoding::Binary`] | [`BinaryCodec`] | ✓ | ✗ | ✗ |
//!
//! The client never branches on the encoding; it asks the codec through
//! [`Codec::supports_bits`] and [`Codec::supports_writes`].
//!
//! # Example
//!
//! ```
//! use fx3_mcprotocol::{Codec, Device, Encoding};
//!
//! let codec = Encoding::Ascii.codec();
//! let frame = codec.build_read_words(Device::D, 100, 3).unwrap();
//! assert_eq!(frame, b"01FF000A4420000000640300");
//!
//! let values = codec.parse_read_words(b"81003412785634BC", 3).unwrap();
//! assert_eq!(values, vec![0x1234, 0x5678, 0xBC34]);
//! ```

use std::str::FromStr;

use crate::ascii::AsciiCodec;
use crate::binary::BinaryCodec;
use crate::device::Device;
use crate::error::{McError, Result};

/// Station (PC) number sent in every request.
pub(crate) const PC_NO: u8 = 0xFF;

/// Monitoring timer sent in every request, in 250 ms units (2.5 s).
pub(crate) const MONITOR_TIMER: u16 = 0x000A;

/// Bit batch read command.
pub(crate) const CMD_READ_BITS: u8 = 0x00;
/// Word batch read command.
pub(crate) const CMD_READ_WORDS: u8 = 0x01;
/// Bit batch write command.
pub(crate) const CMD_WRITE_BITS: u8 = 0x02;
/// Word batch write command.
pub(crate) const CMD_WRITE_WORDS: u8 = 0x03;

/// Frame builder and parser for one MC protocol encoding.
///
/// Operations a codec does not implement return [`McError::Unsupported`];
/// the capability flags tell callers which ones those are.
pub trait Codec: Send + Sync + std::fmt::Debug {
    /// Encoding implemented by this codec.
    fn encoding(&self) -> Encoding;

    /// Whether bit reads (and bit writes, if writes are supported) are available.
    fn supports_bits(&self) -> bool;

    /// Whether write operations are available.
    fn supports_writes(&self) -> bool;

    /// Builds a word batch read request.
    fn build_read_words(&self, device: Device, start: u32, count: usize) -> Result<Vec<u8>>;

    /// Builds a bit batch read request.
    fn build_read_bits(&self, _device: Device, _start: u32, _count: usize) -> Result<Vec<u8>> {
        Err(unsupported("bit read", self.encoding()))
    }

    /// Builds a word batch write request.
    fn build_write_words(&self, _device: Device, _start: u32, _values: &[u16]) -> Result<Vec<u8>> {
        Err(unsupported("word write", self.encoding()))
    }

    /// Builds a bit batch write request.
    fn build_write_bits(&self, _device: Device, _start: u32, _values: &[bool]) -> Result<Vec<u8>> {
        Err(unsupported("bit write", self.encoding()))
    }

    /// Parses the response to a word batch read.
    fn parse_read_words(&self, frame: &[u8], count: usize) -> Result<Vec<u16>>;

    /// Parses the response to a bit batch read.
    fn parse_read_bits(&self, _frame: &[u8], _count: usize) -> Result<Vec<bool>> {
        Err(unsupported("bit read", self.encoding()))
    }

    /// Checks the completion status of a write response.
    fn parse_write_response(&self, frame: &[u8]) -> Result<()>;
}

/// Error for an operation `encoding` does not implement.
pub(crate) fn unsupported(operation: &'static str, encoding: Encoding) -> McError {
    McError::Unsupported {
        operation,
        encoding: encoding.name(),
    }
}

/// Looks up the device code of `device` for `encoding`.
pub(crate) fn device_code(device: Device, encoding: Encoding) -> Result<u16> {
    device.code().ok_or_else(|| McError::UnsupportedDevice {
        device: device.to_string(),
        encoding: encoding.name(),
    })
}

static ASCII_CODEC: AsciiCodec = AsciiCodec;
static BINARY_CODEC: BinaryCodec = BinaryCodec;

/// MC protocol encoding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Encoding {
    /// Hex text frames (default).
    #[default]
    Ascii,
    /// Packed little-endian frames.
    Binary,
}

impl Encoding {
    /// Returns the codec for this encoding.
    pub fn codec(self) -> &'static dyn Codec {
        match self {
            Encoding::Ascii => &ASCII_CODEC,
            Encoding::Binary => &BINARY_CODEC,
        }
    }

    /// Returns the lowercase encoding name.
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Ascii => "ascii",
            Encoding::Binary => "binary",
        }
    }
}

impl FromStr for Encoding {
    type Err = McError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascii" => Ok(Encoding::Ascii),
            "binary" => Ok(Encoding::Binary),
            other => Err(McError::invalid_config(format!(
                "mode must be 'ascii' or 'binary', got '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
