//! Symbol parsing.
//!
//! Converts user-facing addresses such as `D100`, `M8000` or `tn5` into a
//! [`Symbol`]. Only the shape of the text and the device class are checked
//! here; index ranges belong to the CPU profile.

use std::str::FromStr;

use crate::device::Device;
use crate::error::{McError, Result};

/// A parsed PLC memory reference.
///
/// # Example
///
/// ```
/// use fx3_mcprotocol::{parse_symbol, Device};
///
/// let sym = parse_symbol("D100").unwrap();
/// assert_eq!(sym.device, Device::D);
/// assert_eq!(sym.index, 100);
/// assert!(!sym.is_bit());
///
/// let sym = parse_symbol(" m8000 ").unwrap();
/// assert_eq!(sym.device, Device::M);
/// assert!(sym.is_bit());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol {
    /// Device class.
    pub device: Device,
    /// Decimal index within the device class.
    pub index: u32,
}

impl Symbol {
    /// Creates a symbol from its parts.
    pub fn new(device: Device, index: u32) -> Self {
        Self { device, index }
    }

    /// Returns whether the symbol refers to a bit device.
    pub fn is_bit(&self) -> bool {
        self.device.is_bit()
    }
}

impl FromStr for Symbol {
    type Err = McError;

    fn from_str(s: &str) -> Result<Self> {
        parse_symbol(s)
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.device, self.index)
    }
}

/// Parses a symbol of the form `<letters><digits>`.
///
/// Surrounding whitespace is ignored and letters are case-insensitive.
///
/// # Errors
///
/// Returns `McError::InvalidSymbol` if the text does not match the shape,
/// the device letters are unknown, or the index does not fit in a `u32`.
pub fn parse_symbol(symbol: &str) -> Result<Symbol> {
    let text = symbol.trim().to_ascii_uppercase();

    let split = text
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(text.len());
    let (letters, digits) = text.split_at(split);

    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(McError::invalid_symbol(format!(
            "Invalid symbol format: {}",
            symbol
        )));
    }

    let device: Device = letters.parse()?;
    let index = digits.parse::<u32>().map_err(|_| {
        McError::invalid_symbol(format!("Symbol index out of range: {}", symbol))
    })?;

    Ok(Symbol { device, index })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_word_symbol() {
        let s = parse_symbol("D100").unwrap();
        assert_eq!(s.device, Device::D);
        assert_eq!(s.index, 100);
        assert!(!s.is_bit());
    }

    #[test]
    fn test_parse_bit_symbol() {
        let s = parse_symbol("M8000").unwrap();
        assert_eq!(s.device, Device::M);
        assert_eq!(s.index, 8000);
        assert!(s.is_bit());
    }

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        assert_eq!(parse_symbol("  x17\t").unwrap(), Symbol::new(Device::X, 17));
        assert_eq!(parse_symbol("Tn5").unwrap(), Symbol::new(Device::TN, 5));
        assert_eq!(parse_symbol("D007").unwrap().index, 7);
    }

    #[test]
    fn test_parse_is_deterministic() {
        for text in ["D0", "R7999", "CS12", "Y1023"] {
            assert_eq!(parse_symbol(text).unwrap(), parse_symbol(text).unwrap());
        }
    }

    #[test]
    fn test_unsupported_device() {
        let err = parse_symbol("Q100").unwrap_err();
        assert_eq!(err.to_string(), "Invalid symbol: Unsupported device type: Q");
    }

    #[test]
    fn test_negative_index() {
        assert!(matches!(
            parse_symbol("D-1"),
            Err(McError::InvalidSymbol { .. })
        ));
    }

    #[test]
    fn test_invalid_shapes() {
        for text in ["", "D", "100", "D10A", "D 10", "1D", "D1.5", "Ä1"] {
            assert!(parse_symbol(text).is_err(), "{:?} should fail", text);
        }
    }

    #[test]
    fn test_index_overflow() {
        assert!(parse_symbol("D99999999999").is_err());
    }

    #[test]
    fn test_from_str_and_display() {
        let sym: Symbol = "cn42".parse().unwrap();
        assert_eq!(sym.to_string(), "CN42");
    }
}
