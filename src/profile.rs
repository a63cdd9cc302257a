//! CPU memory profiles.
//!
//! Each supported FX3 CPU has a [`DeviceProfile`] describing the highest
//! valid index per device class. Ranges follow the public Mitsubishi
//! documentation and may differ with firmware or expansion modules.
//!
//! Devices without a defined limit are accepted by [`DeviceProfile::validate`].
//! Use [`DeviceProfile::validate_strict`] (or [`LimitPolicy::Strict`] on the
//! client) to reject them instead.
//!
//! # Example
//!
//! ```
//! use fx3_mcprotocol::{CpuModel, Device};
//!
//! let profile = CpuModel::FX3U.profile();
//! assert!(profile.validate(Device::D, 100, 5).is_ok());
//! assert!(profile.validate(Device::D, 8000, 1).is_err());
//! assert!(profile.validate(Device::M, 8000, 1).is_ok());
//!
//! // Timers have no limit in any profile
//! assert!(profile.validate(Device::TN, 100_000, 1).is_ok());
//! ```

use std::str::FromStr;

use crate::device::Device;
use crate::error::{McError, Result};

/// Valid memory ranges for one CPU model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceProfile {
    name: &'static str,
    limits: &'static [(Device, u32)],
}

impl DeviceProfile {
    /// Returns the CPU model name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the highest valid index for `device`, if one is defined.
    pub fn limit(&self, device: Device) -> Option<u32> {
        self.limits
            .iter()
            .find(|(d, _)| *d == device)
            .map(|&(_, max)| max)
    }

    /// Checks that `count` items starting at `start` fit within the limit of `device`.
    ///
    /// Devices with no defined limit always pass, whatever the count.
    ///
    /// # Errors
    ///
    /// Returns `McError::InvalidParameter` if `count` is 0 and
    /// `McError::OutOfRange` if the last index exceeds the limit.
    pub fn validate(&self, device: Device, start: u32, count: usize) -> Result<()> {
        match self.limit(device) {
            Some(max) => self.check_range(device, start, count, max),
            None => Ok(()),
        }
    }

    /// Same as [`validate`](Self::validate), but rejects devices with no defined limit.
    pub fn validate_strict(&self, device: Device, start: u32, count: usize) -> Result<()> {
        match self.limit(device) {
            Some(max) => self.check_range(device, start, count, max),
            None => Err(McError::invalid_symbol(format!(
                "{} has no defined range for {}",
                device, self.name
            ))),
        }
    }

    fn check_range(&self, device: Device, start: u32, count: usize, max: u32) -> Result<()> {
        if count == 0 {
            return Err(McError::invalid_parameter("count", "must be positive"));
        }

        let end = u64::from(start).saturating_add(count as u64 - 1);
        if end > u64::from(max) {
            return Err(McError::OutOfRange {
                device: device.to_string(),
                start,
                end,
                max,
                cpu: self.name,
            });
        }
        Ok(())
    }
}

static FX3S: DeviceProfile = DeviceProfile {
    name: "FX3S",
    limits: &[
        (Device::D, 7999),
        (Device::M, 4095),
        (Device::X, 255),
        (Device::Y, 255),
        (Device::R, 7999),
    ],
};

static FX3G: DeviceProfile = DeviceProfile {
    name: "FX3G",
    limits: &[
        (Device::D, 7999),
        (Device::M, 8191),
        (Device::X, 511),
        (Device::Y, 511),
        (Device::R, 7999),
    ],
};

static FX3GC: DeviceProfile = DeviceProfile {
    name: "FX3GC",
    limits: &[
        (Device::D, 7999),
        (Device::M, 8191),
        (Device::X, 511),
        (Device::Y, 511),
        (Device::R, 7999),
    ],
};

static FX3U: DeviceProfile = DeviceProfile {
    name: "FX3U",
    limits: &[
        (Device::D, 7999),
        (Device::M, 16383),
        (Device::X, 1023),
        (Device::Y, 1023),
        (Device::R, 7999),
    ],
};

/// Supported FX3 CPU models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum CpuModel {
    /// FX3S.
    FX3S,
    /// FX3G.
    FX3G,
    /// FX3GC.
    FX3GC,
    /// FX3U (default).
    #[default]
    FX3U,
}

impl CpuModel {
    /// All supported CPU models.
    pub const ALL: [CpuModel; 4] = [
        CpuModel::FX3S,
        CpuModel::FX3G,
        CpuModel::FX3GC,
        CpuModel::FX3U,
    ];

    /// Returns the memory profile of this CPU model.
    pub fn profile(self) -> &'static DeviceProfile {
        match self {
            CpuModel::FX3S => &FX3S,
            CpuModel::FX3G => &FX3G,
            CpuModel::FX3GC => &FX3GC,
            CpuModel::FX3U => &FX3U,
        }
    }

    /// Returns the model name.
    pub fn name(self) -> &'static str {
        self.profile().name
    }
}

impl FromStr for CpuModel {
    type Err = McError;

    /// Parses a CPU model name, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        CpuModel::ALL
            .into_iter()
            .find(|cpu| cpu.name() == upper)
            .ok_or_else(|| {
                let supported: Vec<&str> = CpuModel::ALL.iter().map(|cpu| cpu.name()).collect();
                McError::invalid_config(format!(
                    "Unsupported CPU '{}'. Supported: {}",
                    upper,
                    supported.join(", ")
                ))
            })
    }
}

impl std::fmt::Display for CpuModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How the client treats devices that have no limit in the selected profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LimitPolicy {
    /// Accept any range for devices without a defined limit.
    #[default]
    Permissive,
    /// Reject devices without a defined limit.
    Strict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_range() {
        assert!(FX3U.validate(Device::D, 100, 5).is_ok());
        assert!(FX3U.validate(Device::D, 7995, 5).is_ok());
    }

    #[test]
    fn test_invalid_range() {
        let err = FX3U.validate(Device::D, 8000, 1).unwrap_err();
        assert!(matches!(err, McError::OutOfRange { max: 7999, .. }));

        assert!(FX3U.validate(Device::D, 7996, 5).is_err());
    }

    #[test]
    fn test_bit_range() {
        assert!(FX3U.validate(Device::M, 8000, 1).is_ok());
        assert!(FX3S.validate(Device::M, 8000, 1).is_err());
        assert!(FX3G.validate(Device::M, 8191, 1).is_ok());
    }

    #[test]
    fn test_zero_count_fails_for_limited_devices() {
        for cpu in CpuModel::ALL {
            for device in [Device::D, Device::M, Device::X, Device::Y, Device::R] {
                assert!(cpu.profile().validate(device, 0, 0).is_err());
            }
        }
    }

    #[test]
    fn test_unlimited_devices_are_permissive() {
        for cpu in CpuModel::ALL {
            for device in [Device::TN, Device::TS, Device::CN, Device::CS] {
                assert!(cpu.profile().validate(device, u32::MAX, 0).is_ok());
                assert!(cpu.profile().validate(device, u32::MAX, 100).is_ok());
            }
        }
    }

    #[test]
    fn test_strict_rejects_unlimited_devices() {
        assert!(FX3U.validate_strict(Device::TN, 0, 1).is_err());
        assert!(FX3U.validate_strict(Device::D, 0, 1).is_ok());
        assert!(FX3U.validate_strict(Device::D, 8000, 1).is_err());
    }

    #[test]
    fn test_end_does_not_overflow() {
        assert!(FX3U.validate(Device::D, u32::MAX, usize::MAX).is_err());
    }

    #[test]
    fn test_fx3g_and_fx3gc_match() {
        for device in Device::ALL {
            assert_eq!(FX3G.limit(device), FX3GC.limit(device));
        }
    }

    #[test]
    fn test_cpu_model_from_str() {
        assert_eq!("fx3u".parse::<CpuModel>().unwrap(), CpuModel::FX3U);
        assert_eq!("FX3GC".parse::<CpuModel>().unwrap(), CpuModel::FX3GC);

        let err = "FX1S".parse::<CpuModel>().unwrap_err();
        assert!(matches!(err, McError::InvalidConfig { .. }));
        assert!(err.to_string().contains("FX3S, FX3G, FX3GC, FX3U"));
    }

    #[test]
    fn test_profile_lookup() {
        for cpu in CpuModel::ALL {
            assert_eq!(cpu.profile().name(), cpu.to_string());
        }
        assert_eq!(CpuModel::default(), CpuModel::FX3U);
    }
}
