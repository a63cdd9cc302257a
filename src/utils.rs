//! Word conversion and formatting helpers.
//!
//! FX3 CPUs store 32-bit values in two consecutive data registers with the
//! low word at the lower address (`D100` low, `D101` high). These helpers
//! convert between such word pairs and Rust numeric types.
//!
//! # Example
//!
//! ```
//! use fx3_mcprotocol::utils::{f32_to_words, words_to_f32, words_to_i32, format_hex};
//!
//! // D100 = 0xFFFE, D101 = 0xFFFF
//! assert_eq!(words_to_i32([0xFFFE, 0xFFFF]), -2);
//!
//! let words = f32_to_words(1.5);
//! assert_eq!(words_to_f32(words), 1.5);
//!
//! assert_eq!(format_hex(0x00A5), "0x00A5");
//! ```

/// Combines a low/high word pair into a `u32`.
///
/// # Example
///
/// ```
/// use fx3_mcprotocol::utils::words_to_u32;
///
/// assert_eq!(words_to_u32([0x5678, 0x1234]), 0x1234_5678);
/// ```
#[inline]
pub fn words_to_u32(words: [u16; 2]) -> u32 {
    (u32::from(words[1]) << 16) | u32::from(words[0])
}

/// Splits a `u32` into a low/high word pair.
#[inline]
pub fn u32_to_words(value: u32) -> [u16; 2] {
    [(value & 0xFFFF) as u16, (value >> 16) as u16]
}

/// Combines a low/high word pair into an `i32` (DINT).
#[inline]
pub fn words_to_i32(words: [u16; 2]) -> i32 {
    words_to_u32(words) as i32
}

/// Splits an `i32` into a low/high word pair.
#[inline]
pub fn i32_to_words(value: i32) -> [u16; 2] {
    u32_to_words(value as u32)
}

/// Combines a low/high word pair into an IEEE-754 `f32` (REAL).
#[inline]
pub fn words_to_f32(words: [u16; 2]) -> f32 {
    f32::from_bits(words_to_u32(words))
}

/// Splits an `f32` into a low/high word pair.
#[inline]
pub fn f32_to_words(value: f32) -> [u16; 2] {
    u32_to_words(value.to_bits())
}

/// Formats a word as `0x` followed by four uppercase hex digits.
pub fn format_hex(value: u16) -> String {
    format!("0x{:04X}", value)
}

/// Formats bit values as a string of `1` and `0`, first bit leftmost.
///
/// # Example
///
/// ```
/// use fx3_mcprotocol::utils::format_bits;
///
/// assert_eq!(format_bits(&[true, false, true]), "101");
/// ```
pub fn format_bits(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u32_words() {
        assert_eq!(u32_to_words(0x1234_5678), [0x5678, 0x1234]);
        assert_eq!(words_to_u32(u32_to_words(0xDEAD_BEEF)), 0xDEAD_BEEF);
        assert_eq!(words_to_u32([0, 0]), 0);
    }

    #[test]
    fn test_i32_words() {
        assert_eq!(i32_to_words(-1), [0xFFFF, 0xFFFF]);
        assert_eq!(i32_to_words(-123_456), [0x1DC0, 0xFFFE]);
        assert_eq!(words_to_i32([0x1DC0, 0xFFFE]), -123_456);
        assert_eq!(words_to_i32([0xFFFF, 0x7FFF]), i32::MAX);
    }

    #[test]
    fn test_f32_words() {
        // 123.25 = 0x42F68000
        assert_eq!(f32_to_words(123.25), [0x8000, 0x42F6]);
        assert_eq!(words_to_f32([0x8000, 0x42F6]), 123.25);
        assert_eq!(words_to_f32([0x0000, 0x0000]), 0.0);
    }

    #[test]
    fn test_format_hex() {
        assert_eq!(format_hex(0), "0x0000");
        assert_eq!(format_hex(0xBEEF), "0xBEEF");
    }

    #[test]
    fn test_format_bits() {
        assert_eq!(format_bits(&[]), "");
        assert_eq!(format_bits(&[false, true, true, false]), "0110");
    }
}
