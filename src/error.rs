//! Error types for the MC protocol client.

use std::io;
use thiserror::Error;

/// Result type alias for MC protocol operations.
pub type Result<T> = std::result::Result<T, McError>;

/// Errors that can occur while talking to an FX3 PLC.
#[derive(Debug, Error)]
pub enum McError {
    /// Unsupported CPU model, encoding mode or connection setting.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },

    /// Malformed or unsupported symbol, or a bit/word mismatch for the requested operation.
    #[error("Invalid symbol: {reason}")]
    InvalidSymbol {
        /// Description of the symbol error.
        reason: String,
    },

    /// Address range outside the limits of the selected CPU profile.
    #[error("{device}{start}..{device}{end} out of range for {cpu} (max {device}{max})")]
    OutOfRange {
        /// Device class name.
        device: String,
        /// First requested index.
        start: u32,
        /// Last requested index (inclusive).
        end: u64,
        /// Highest valid index for this device.
        max: u32,
        /// CPU profile name.
        cpu: &'static str,
    },

    /// Invalid parameter provided.
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// Name of the invalid parameter.
        parameter: String,
        /// Description of why the parameter is invalid.
        reason: String,
    },

    /// Operation not implemented by the selected encoding.
    #[error("{operation} is not supported by the {encoding} protocol")]
    Unsupported {
        /// Operation that was attempted.
        operation: &'static str,
        /// Encoding name.
        encoding: &'static str,
    },

    /// Device class has no device code in the selected encoding.
    #[error("Unsupported device for {encoding} protocol: {device}")]
    UnsupportedDevice {
        /// Device class name.
        device: String,
        /// Encoding name.
        encoding: &'static str,
    },

    /// Non-zero completion code returned by the PLC.
    #[error("PLC error completion code: 0x{code:02X}")]
    PlcError {
        /// Raw completion code.
        code: u16,
    },

    /// Malformed or too-short response frame.
    #[error("Invalid response: {reason}")]
    InvalidResponse {
        /// Description of the response error.
        reason: String,
    },

    /// Failure to connect, send or receive, including timeouts.
    #[error("Connection error: {context}: {source}")]
    Connection {
        /// What the transport was doing.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Write attempted on a client constructed in read-only mode.
    #[error("Client is in read-only mode: {operation} rejected")]
    ReadOnly {
        /// Write operation that was rejected.
        operation: &'static str,
    },
}

impl McError {
    /// Creates a new `InvalidConfig` error.
    ///
    /// # Example
    ///
    /// ```
    /// use fx3_mcprotocol::McError;
    ///
    /// let err = McError::invalid_config("timeout must be greater than zero");
    /// ```
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Creates a new `InvalidSymbol` error.
    pub fn invalid_symbol(reason: impl Into<String>) -> Self {
        Self::InvalidSymbol {
            reason: reason.into(),
        }
    }

    /// Creates a new `InvalidParameter` error.
    ///
    /// # Example
    ///
    /// ```
    /// use fx3_mcprotocol::McError;
    ///
    /// let err = McError::invalid_parameter("count", "must not exceed 255");
    /// ```
    pub fn invalid_parameter(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new `InvalidResponse` error.
    pub fn invalid_response(reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            reason: reason.into(),
        }
    }

    /// Creates a new `PlcError` from a raw completion code.
    pub fn plc_error(code: u16) -> Self {
        Self::PlcError { code }
    }

    /// Wraps an I/O error as a `Connection` error.
    pub fn connection(context: impl Into<String>, source: io::Error) -> Self {
        Self::Connection {
            context: context.into(),
            source,
        }
    }

    /// Returns `true` for errors caused by caller input (symbols, ranges,
    /// parameters, unsupported operations).
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSymbol { .. }
                | Self::OutOfRange { .. }
                | Self::InvalidParameter { .. }
                | Self::Unsupported { .. }
                | Self::UnsupportedDevice { .. }
        )
    }

    /// Returns `true` when the PLC rejected the request or answered with a malformed frame.
    pub fn is_plc_error(&self) -> bool {
        matches!(self, Self::PlcError { .. } | Self::InvalidResponse { .. })
    }

    /// Returns `true` when a transport operation timed out.
    ///
    /// # Example
    ///
    /// ```
    /// use fx3_mcprotocol::McError;
    /// use std::io;
    ///
    /// let err = McError::connection("receive", io::Error::from(io::ErrorKind::TimedOut));
    /// assert!(err.is_timeout());
    /// ```
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Connection { source, .. } => matches!(
                source.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plc_error_display() {
        let err = McError::plc_error(0x5B);
        assert_eq!(err.to_string(), "PLC error completion code: 0x5B");
    }

    #[test]
    fn test_out_of_range_display() {
        let err = McError::OutOfRange {
            device: "D".to_string(),
            start: 8000,
            end: 8000,
            max: 7999,
            cpu: "FX3U",
        };
        assert_eq!(
            err.to_string(),
            "D8000..D8000 out of range for FX3U (max D7999)"
        );
    }

    #[test]
    fn test_read_only_display() {
        let err = McError::ReadOnly {
            operation: "write_regs",
        };
        assert_eq!(
            err.to_string(),
            "Client is in read-only mode: write_regs rejected"
        );
    }

    #[test]
    fn test_connection_keeps_source() {
        use std::error::Error as _;

        let err = McError::connection(
            "failed to connect to 10.0.0.1:5001",
            io::Error::from(io::ErrorKind::ConnectionRefused),
        );
        assert!(err.source().is_some());
        assert!(!err.is_timeout());
        assert!(err.to_string().starts_with("Connection error: failed to connect"));
    }

    #[test]
    fn test_classification() {
        assert!(McError::invalid_symbol("bad").is_caller_error());
        assert!(McError::invalid_parameter("count", "zero").is_caller_error());
        assert!(!McError::plc_error(1).is_caller_error());
        assert!(McError::plc_error(1).is_plc_error());
        assert!(McError::invalid_response("too short").is_plc_error());
        assert!(!McError::invalid_config("x").is_plc_error());
        assert!(McError::connection("receive", io::Error::from(io::ErrorKind::WouldBlock))
            .is_timeout());
    }
}
