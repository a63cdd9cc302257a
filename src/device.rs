//! Device class definitions for FX3 PLCs.
//!
//! This module defines the [`Device`] enum which represents the memory
//! categories addressable on an FX3 CPU. Every device is either a bit device
//! or a word device; the kind is fixed by the device class.
//!
//! # Devices Overview
//!
//! | Device | Description | Kind |
//! |--------|-------------|:----:|
//! | D  | Data register | word |
//! | R  | Extension register | word |
//! | TN | Timer current value | word |
//! | TS | Timer contact | word |
//! | CN | Counter current value | word |
//! | CS | Counter contact | word |
//! | M  | Internal relay | bit |
//! | X  | Input | bit |
//! | Y  | Output | bit |
//!
//! # Example
//!
//! ```
//! use fx3_mcprotocol::Device;
//!
//! assert!(Device::M.is_bit());
//! assert!(!Device::D.is_bit());
//! assert_eq!("tn".parse::<Device>().unwrap(), Device::TN);
//! assert_eq!(Device::CN.to_string(), "CN");
//! ```

use std::str::FromStr;

use crate::error::{McError, Result};

/// Device classes available on FX3 PLCs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Device {
    /// Data register.
    D,
    /// Internal relay.
    M,
    /// Input.
    X,
    /// Output.
    Y,
    /// Extension register.
    R,
    /// Timer current value.
    TN,
    /// Timer contact.
    TS,
    /// Counter current value.
    CN,
    /// Counter contact.
    CS,
}

impl Device {
    /// All supported device classes.
    pub const ALL: [Device; 9] = [
        Device::D,
        Device::M,
        Device::X,
        Device::Y,
        Device::R,
        Device::TN,
        Device::TS,
        Device::CN,
        Device::CS,
    ];

    /// Returns whether this is a bit device (M, X, Y).
    pub fn is_bit(self) -> bool {
        matches!(self, Device::M | Device::X | Device::Y)
    }

    /// Returns the device name as written in symbols.
    pub fn name(self) -> &'static str {
        match self {
            Device::D => "D",
            Device::M => "M",
            Device::X => "X",
            Device::Y => "Y",
            Device::R => "R",
            Device::TN => "TN",
            Device::TS => "TS",
            Device::CN => "CN",
            Device::CS => "CS",
        }
    }

    /// Returns the MC protocol device code, if this device has one.
    ///
    /// Both encodings share this table; the ASCII frame carries the code as
    /// four hex digits, the binary frame as a little-endian `u16`.
    pub(crate) fn code(self) -> Option<u16> {
        match self {
            Device::D => Some(0x4420),
            Device::M => Some(0x4D20),
            Device::X => Some(0x5820),
            Device::Y => Some(0x5920),
            Device::R => Some(0x5220),
            Device::TN | Device::TS | Device::CN | Device::CS => None,
        }
    }
}

impl FromStr for Device {
    type Err = McError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        Device::ALL
            .into_iter()
            .find(|device| device.name() == upper)
            .ok_or_else(|| McError::invalid_symbol(format!("Unsupported device type: {}", upper)))
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_codes() {
        assert_eq!(Device::D.code(), Some(0x4420));
        assert_eq!(Device::M.code(), Some(0x4D20));
        assert_eq!(Device::X.code(), Some(0x5820));
        assert_eq!(Device::Y.code(), Some(0x5920));
        assert_eq!(Device::R.code(), Some(0x5220));
        assert_eq!(Device::TN.code(), None);
        assert_eq!(Device::CS.code(), None);
    }

    #[test]
    fn test_is_bit() {
        let bits: Vec<Device> = Device::ALL.into_iter().filter(|d| d.is_bit()).collect();
        assert_eq!(bits, vec![Device::M, Device::X, Device::Y]);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("D".parse::<Device>().unwrap(), Device::D);
        assert_eq!(" cs ".parse::<Device>().unwrap(), Device::CS);
        assert!("Q".parse::<Device>().is_err());
        assert!("".parse::<Device>().is_err());
    }

    #[test]
    fn test_display() {
        for device in Device::ALL {
            assert_eq!(device.to_string(), device.name());
        }
    }
}
